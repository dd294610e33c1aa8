//! Integration tests for loading from command-line flags.

use std::collections::HashMap;
use std::time::Duration;

use qcl::{ConfigError, Configure, FlagSource, Source};

#[derive(Debug, Default, PartialEq, Configure)]
struct Server {
    host: String,
    port: i32,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Db {
    host: String,
    port: i32,
    ssl: bool,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Nested {
    host: String,
    port: i32,
    ssl: bool,
    db: Db,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Scalars {
    bool: bool,
    int8: i8,
    uint64: u64,
    float64: f64,
    duration: Duration,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Collections {
    hosts: Vec<String>,
    ports: HashMap<String, i32>,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Pool {
    max_idle_conns: u32,
    #[qcl(flag = "Timeout")]
    idle_timeout: Duration,
    #[qcl(env = "POOL_LABEL")]
    label: String,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct App {
    #[qcl(embed)]
    server: Server,
    pool: Pool,
    replica: Option<Db>,
}

fn load_flags<T: Configure>(args: &[&str], target: &mut T) -> Result<FlagSource, ConfigError> {
    let mut source = FlagSource::new().with_args(std::iter::once("app").chain(args.iter().copied()));
    source.load(target)?;
    Ok(source)
}

#[test]
fn test_flags_none() {
    let mut server = Server {
        host: "default".to_string(),
        port: 1,
    };
    load_flags(&[], &mut server).unwrap();
    assert_eq!(server.host, "default");
    assert_eq!(server.port, 1);
}

#[test]
fn test_flags_host_and_port() {
    let mut server = Server::default();
    load_flags(&["-host", "localhost", "-port", "8080"], &mut server).unwrap();
    assert_eq!(
        server,
        Server {
            host: "localhost".to_string(),
            port: 8080,
        }
    );
}

#[test]
fn test_flags_double_dash_and_equals() {
    let mut server = Server::default();
    load_flags(&["--host=localhost", "-port=8080"], &mut server).unwrap();
    assert_eq!(server.host, "localhost");
    assert_eq!(server.port, 8080);
}

#[test]
fn test_flags_nested() {
    let mut config = Nested::default();
    load_flags(
        &[
            "-host", "localhost", "-port", "8080", "-ssl", "true", "-db.host", "db", "-db.port",
            "5432", "-db.ssl", "true",
        ],
        &mut config,
    )
    .unwrap();
    assert_eq!(
        config,
        Nested {
            host: "localhost".to_string(),
            port: 8080,
            ssl: true,
            db: Db {
                host: "db".to_string(),
                port: 5432,
                ssl: true,
            },
        }
    );
}

#[test]
fn test_flags_scalars() {
    let mut config = Scalars::default();
    load_flags(
        &[
            "-bool", "yes", "-int8", "-2", "-uint64", "10", "-float64", "11.1", "-duration",
            "1m 30s",
        ],
        &mut config,
    )
    .unwrap();
    assert_eq!(
        config,
        Scalars {
            bool: true,
            int8: -2,
            uint64: 10,
            float64: 11.1,
            duration: Duration::from_secs(90),
        }
    );
}

#[test]
fn test_flags_collections_accumulate_over_occurrences() {
    let mut config = Collections::default();
    load_flags(
        &[
            "-hosts", "localhost,somehost", "-hosts", "third", "-ports", "a=1,b=2", "-ports",
            "a=3",
        ],
        &mut config,
    )
    .unwrap();
    assert_eq!(config.hosts, ["localhost", "somehost", "third"]);
    assert_eq!(config.ports.len(), 2);
    assert_eq!(config.ports["a"], 3);
    assert_eq!(config.ports["b"], 2);
}

#[test]
fn test_flags_repeated_scalar_last_wins() {
    let mut server = Server::default();
    load_flags(&["-port", "1", "-port", "2"], &mut server).unwrap();
    assert_eq!(server.port, 2);
}

#[test]
fn test_flags_naming() {
    let source = FlagSource::new();
    let flags = source.register(&mut App::default()).unwrap();
    let names: Vec<&str> = flags.names().collect();
    assert_eq!(
        names,
        [
            "host",
            "port",
            "pool.max.idle.conns",
            "pool.timeout",
            "pool.label",
            "replica.host",
            "replica.port",
            "replica.ssl",
        ]
    );
}

#[test]
fn test_flags_optional_struct() {
    let mut app = App::default();
    load_flags(&["-pool.timeout", "5s"], &mut app).unwrap();
    assert_eq!(app.pool.idle_timeout, Duration::from_secs(5));
    assert_eq!(app.replica, None);

    let mut app = App::default();
    load_flags(&["-replica.ssl", "on"], &mut app).unwrap();
    assert_eq!(
        app.replica,
        Some(Db {
            host: String::new(),
            port: 0,
            ssl: true,
        })
    );
}

#[test]
fn test_flags_positionals() {
    let mut server = Server::default();
    let source = load_flags(&["-host", "h", "serve", "-port", "1"], &mut server).unwrap();
    assert_eq!(server.host, "h");
    assert_eq!(server.port, 0);
    assert_eq!(source.args(), ["serve", "-port", "1"]);
}

#[test]
fn test_flags_terminator() {
    let mut server = Server::default();
    let source = load_flags(&["-port", "1", "--", "-host", "h"], &mut server).unwrap();
    assert_eq!(server.port, 1);
    assert_eq!(server.host, "");
    assert_eq!(source.args(), ["-host", "h"]);
}

#[test]
fn test_flags_unknown_flag() {
    let mut server = Server::default();
    let err = load_flags(&["-nope", "1"], &mut server).unwrap_err();
    assert!(matches!(err, ConfigError::Flags(_)));
}

#[test]
fn test_flags_missing_value() {
    let mut server = Server::default();
    let err = load_flags(&["-port"], &mut server).unwrap_err();
    assert!(matches!(err, ConfigError::Flags(_)));
}

#[test]
fn test_flags_unparseable_value() {
    let mut server = Server::default();
    let err = load_flags(&["-port", "http"], &mut server).unwrap_err();
    assert!(matches!(err, ConfigError::TypeConversion { .. }));
}

#[test]
fn test_flags_duplicate_names() {
    #[derive(Debug, Default, Configure)]
    struct Clash {
        host: String,
        #[qcl(flag = "host")]
        hostname: String,
    }

    let mut clash = Clash::default();
    let err = load_flags(&["-host", "h"], &mut clash).unwrap_err();
    match err {
        ConfigError::DuplicateFlag { name } => assert_eq!(name, "host"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_flags_usage() {
    let usage = FlagSource::new()
        .with_args(["app"])
        .usage(&mut App::default())
        .unwrap();
    assert!(usage.contains("--pool.max.idle.conns"));
    assert!(usage.contains("--replica.ssl"));
}
