//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use augur_config::{AugurConfig, DatabaseTarget};
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
url = "sqlite:///srv/augur/questions.db"
echo = true
"#,
        )?;

        let config: AugurConfig = Figment::from(Serialized::defaults(AugurConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.url, "sqlite:///srv/augur/questions.db");
        assert!(config.database.echo);
        assert_eq!(
            config.database.target().unwrap(),
            DatabaseTarget::Local("/srv/augur/questions.db".into())
        );
        // untouched section keeps its defaults
        assert_eq!(config.general.unused_batch_size, 5);
        Ok(())
    });
}

#[test]
fn loads_project_local_config() {
    Jail::expect_with(|jail| {
        jail.create_dir(".augur")?;
        jail.create_file(
            ".augur/config.toml",
            r#"
[general]
unused_batch_size = 12
"#,
        )?;

        let config = AugurConfig::load().expect("config loads");
        assert_eq!(config.general.unused_batch_size, 12);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
url = "from-toml.db"
"#,
        )?;
        jail.set_env("AUGUR_DATABASE__URL", "from-env.db");

        let config: AugurConfig = Figment::from(Serialized::defaults(AugurConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("AUGUR_").split("__"))
            .extract()?;

        assert_eq!(config.database.url, "from-env.db");
        Ok(())
    });
}

#[test]
fn load_reads_env_through_full_chain() {
    Jail::expect_with(|jail| {
        jail.set_env("AUGUR_DATABASE__URL", "libsql://augur-dev.turso.io");
        jail.set_env("AUGUR_DATABASE__AUTH_TOKEN", "tok-abc");
        jail.set_env("AUGUR_GENERAL__UNUSED_BATCH_SIZE", "3");

        let config = AugurConfig::load().expect("config loads");
        assert_eq!(config.general.unused_batch_size, 3);
        assert_eq!(
            config.database.target().unwrap(),
            DatabaseTarget::Remote {
                url: "libsql://augur-dev.turso.io".into(),
                auth_token: "tok-abc".into(),
            }
        );
        Ok(())
    });
}

#[test]
fn load_rejects_zero_batch_size() {
    Jail::expect_with(|jail| {
        jail.set_env("AUGUR_GENERAL__UNUSED_BATCH_SIZE", "0");
        assert!(AugurConfig::load().is_err());
        Ok(())
    });
}
