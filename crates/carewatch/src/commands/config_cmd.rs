//! Configuration inspection and scaffolding.

use carewatch_config::{Config, Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            let redacted = redact(cfg);
            let rendered = toml::to_string_pretty(&redacted)
                .map_err(|e| CliError::Config {
                    message: e.to_string(),
                })?;

            if !global.quiet {
                eprintln!("# {}", config_path().display());
            }
            println!("{rendered}");
            Ok(())
        }

        ConfigCommand::Init => {
            let path = config_path();
            if path.exists() {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists", path.display()),
                });
            }

            let mut cfg = Config::default();
            cfg.profiles.insert(
                "default".into(),
                Profile {
                    server: "https://monitor.example.com".into(),
                    account: Some("your-account".into()),
                    token_env: Some("CAREWATCH_TOKEN".into()),
                    ..Profile::default()
                },
            );

            save_config(&cfg).map_err(CliError::from)?;
            if !global.quiet {
                eprintln!("Wrote starter config to {}", path.display());
            }
            Ok(())
        }
    }
}

/// Blank out secret material before printing.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("<redacted>".into());
        }
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }
    cfg
}
