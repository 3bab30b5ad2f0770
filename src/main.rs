//! argbind - sample program binding a server configuration from argv.

use anyhow::{Context, Result};
use argbind::{Binding, ParseOptions, Parser, Registry};
use serde::Serialize;
use std::io;

/// The configuration the sample binds from the command line.
#[derive(Debug, Serialize)]
struct ServerConfig {
    ip: String,
    port: i32,
    user: String,
    password: String,
    debug: bool,
    log_to_file: bool,
    gui_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: 0,
            user: String::new(),
            password: String::new(),
            debug: false,
            log_to_file: false,
            gui_enabled: true,
        }
    }
}

fn bindings() -> Registry<ServerConfig> {
    Registry::from_bindings([
        Binding::string("ip", |c: &ServerConfig| c.ip.clone(), |c, v| c.ip = v)
            .describe("The ip of the server."),
        Binding::int32("port", |c: &ServerConfig| c.port, |c, v| c.port = v)
            .describe("The port of the server."),
        Binding::string("user", |c: &ServerConfig| c.user.clone(), |c, v| c.user = v)
            .describe("The username for the login."),
        Binding::string(
            "password",
            |c: &ServerConfig| c.password.clone(),
            |c, v| c.password = v,
        ),
        Binding::boolean("debug", |c: &ServerConfig| c.debug, |c, v| c.debug = v).hide(),
        Binding::boolean(
            "log",
            |c: &ServerConfig| c.log_to_file,
            |c, v| c.log_to_file = v,
        )
        .describe("If true the program will log to file."),
        Binding::boolean(
            "gui",
            |c: &ServerConfig| c.gui_enabled,
            |c, v| c.gui_enabled = v,
        ),
    ])
}

fn main() -> Result<()> {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    let registry = bindings();
    let mut config = ServerConfig::default();
    let mut parser = Parser::new(ParseOptions {
        case_sensitive: false,
        description: "A sample server configured from the command line.".to_string(),
        ..ParseOptions::default()
    });
    parser.observe("port", |key| {
        eprintln!("note: '{}' overridden from the command line", key);
    });

    parser
        .parse_with_help(&registry, &mut config, &tokens, &mut io::stderr())
        .context("failed to parse command line")?;

    let rendered =
        serde_json::to_string_pretty(&config).context("failed to encode configuration")?;
    println!("{}", rendered);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sample_sequence_binds_all_fields() {
        let registry = bindings();
        let mut config = ServerConfig::default();
        let mut parser = Parser::new(ParseOptions {
            case_sensitive: false,
            ..ParseOptions::default()
        });

        let summary = parser
            .parse(
                &registry,
                &mut config,
                &tokens("-gui +log --ip localhost +debug --port 8080 --user Admin --password 1234"),
            )
            .unwrap();

        assert_eq!(config.ip, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.user, "Admin");
        assert_eq!(config.password, "1234");
        assert!(config.debug);
        assert!(config.log_to_file);
        assert!(!config.gui_enabled);
        assert_eq!(summary.touched.len(), 7);
    }

    #[test]
    fn test_gui_defaults_on() {
        assert!(ServerConfig::default().gui_enabled);
    }

    #[test]
    fn test_help_hides_debug_binding() {
        let registry = bindings();
        let help = argbind::render_help("", true, &[&registry]);

        assert!(help.contains("The ip of the server."));
        assert!(help.contains("+/- log"));
        assert!(!help.contains("debug"));
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&ServerConfig::default()).unwrap();
        assert!(json.contains("\"gui_enabled\":true"));
        assert!(json.contains("\"port\":0"));
    }
}
