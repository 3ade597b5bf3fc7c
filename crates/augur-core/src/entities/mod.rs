//! Entity structs for all Augur domain objects.
//!
//! Each entity maps to a table in the libSQL database (`augur-db`
//! migrations). List fields are decoded from their JSON text columns and
//! timestamps serialize in the `YYYY-MM-DD HH:MM:SS` form callers expect.

mod question;
mod user;

pub use question::{Question, QuestionView};
pub use user::User;
