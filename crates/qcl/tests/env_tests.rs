//! Integration tests for loading from the process environment.
//!
//! Every test uses its own variable prefix so tests can run in parallel
//! against the shared process environment.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use qcl::{ConfigError, Configure, EnvSource, Shape, Source};

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
struct AllTypes {
    bool: bool,
    isize: isize,
    int8: i8,
    int16: i16,
    int32: i32,
    int64: i64,
    usize: usize,
    uint8: u8,
    uint16: u16,
    uint32: u32,
    uint64: u64,
    float64: f64,
    float32: f32,
    duration: Duration,
    path: PathBuf,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Lists {
    hosts: Vec<String>,
    ports: Vec<i32>,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Maps {
    hosts: HashMap<String, String>,
    ports: BTreeMap<String, i32>,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Optionals {
    host: Option<String>,
    port: Option<i32>,
    ssl: Option<bool>,
    db: Option<Box<Db>>,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Tagged {
    #[qcl(mytag = "Host")]
    not_host: String,
    #[qcl(mytag = "Port")]
    not_port: i32,
}

#[derive(Debug, Default, PartialEq, Configure)]
struct Embedding {
    #[qcl(embed)]
    server: Server,
    #[qcl(env = "MaxIdleConns")]
    conns: u32,
}

fn set_env(vars: &[(&str, &str)]) {
    for (key, value) in vars {
        env::set_var(key, value);
    }
}

fn load_env<T: Configure>(prefix: &str, target: &mut T) -> Result<usize, ConfigError> {
    EnvSource::new().with_prefix(prefix).load(target)
}

#[test]
fn test_env_prefix() {
    set_env(&[("ENVPFX_HOST", "localhost"), ("ENVPFX_PORT", "8080")]);

    let mut server = Server::default();
    load_env("ENVPFX", &mut server).unwrap();
    assert_eq!(
        server,
        Server {
            host: "localhost".to_string(),
            port: 8080,
        }
    );

    let mut server = Server::default();
    load_env("ENVPFX_", &mut server).unwrap();
    assert_eq!(server.port, 8080);
}

#[test]
fn test_env_prefix_with_multiple_underscores() {
    set_env(&[("ENVDBL__HOST", "localhost"), ("ENVDBL__PORT", "8080")]);

    let mut server = Server::default();
    load_env("ENVDBL__", &mut server).unwrap();
    assert_eq!(server.host, "localhost");
    assert_eq!(server.port, 8080);
}

#[test]
fn test_env_nested() {
    set_env(&[
        ("ENVNEST_HOST", "localhost"),
        ("ENVNEST_PORT", "8080"),
        ("ENVNEST_SSL", "true"),
        ("ENVNEST_DB_HOST", "db"),
        ("ENVNEST_DB_PORT", "5432"),
        ("ENVNEST_DB_SSL", "true"),
    ]);

    let mut config = Nested::default();
    load_env("ENVNEST", &mut config).unwrap();
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
fn test_env_all_supported_types() {
    set_env(&[
        ("ENVALL_BOOL", "true"),
        ("ENVALL_ISIZE", "1"),
        ("ENVALL_INT8", "2"),
        ("ENVALL_INT16", "3"),
        ("ENVALL_INT32", "4"),
        ("ENVALL_INT64", "5"),
        ("ENVALL_USIZE", "6"),
        ("ENVALL_UINT8", "7"),
        ("ENVALL_UINT16", "8"),
        ("ENVALL_UINT32", "9"),
        ("ENVALL_UINT64", "10"),
        ("ENVALL_FLOAT64", "11.1"),
        ("ENVALL_FLOAT32", "12.2"),
        ("ENVALL_DURATION", "13s"),
        ("ENVALL_PATH", "/etc/app.conf"),
    ]);

    let mut config = AllTypes::default();
    load_env("ENVALL", &mut config).unwrap();
    assert_eq!(
        config,
        AllTypes {
            bool: true,
            isize: 1,
            int8: 2,
            int16: 3,
            int32: 4,
            int64: 5,
            usize: 6,
            uint8: 7,
            uint16: 8,
            uint32: 9,
            uint64: 10,
            float64: 11.1,
            float32: 12.2,
            duration: Duration::from_secs(13),
            path: PathBuf::from("/etc/app.conf"),
        }
    );
}

#[test]
fn test_env_lists() {
    set_env(&[
        ("ENVLIST_HOSTS", "localhost,somehost"),
        ("ENVLIST_PORTS", "8080,8081"),
    ]);

    let mut config = Lists::default();
    load_env("ENVLIST", &mut config).unwrap();
    assert_eq!(config.hosts, ["localhost", "somehost"]);
    assert_eq!(config.ports, [8080, 8081]);
}

#[test]
fn test_env_lists_append_to_defaults() {
    set_env(&[("ENVAPP_PORTS", "8081")]);

    let mut config = Lists {
        hosts: Vec::new(),
        ports: vec![8080],
    };
    load_env("ENVAPP", &mut config).unwrap();
    assert_eq!(config.ports, [8080, 8081]);
}

#[test]
fn test_env_maps() {
    set_env(&[
        ("ENVMAP_HOSTS", "localhost=127.0.0.1,somehost=10.0.0.1"),
        ("ENVMAP_PORTS", "localhost=8080,somehost=8081"),
    ]);

    let mut config = Maps::default();
    load_env("ENVMAP", &mut config).unwrap();
    assert_eq!(config.hosts.len(), 2);
    assert_eq!(config.hosts["localhost"], "127.0.0.1");
    assert_eq!(config.hosts["somehost"], "10.0.0.1");
    assert_eq!(
        config.ports.into_iter().collect::<Vec<_>>(),
        [("localhost".to_string(), 8080), ("somehost".to_string(), 8081)]
    );
}

#[test]
fn test_env_optionals() {
    set_env(&[
        ("ENVOPT_HOST", "localhost"),
        ("ENVOPT_PORT", "8080"),
        ("ENVOPT_SSL", "true"),
        ("ENVOPT_DB_HOST", "db"),
        ("ENVOPT_DB_PORT", "5432"),
        ("ENVOPT_DB_SSL", "true"),
    ]);

    let mut config = Optionals::default();
    load_env("ENVOPT", &mut config).unwrap();
    assert_eq!(
        config,
        Optionals {
            host: Some("localhost".to_string()),
            port: Some(8080),
            ssl: Some(true),
            db: Some(Box::new(Db {
                host: "db".to_string(),
                port: 5432,
                ssl: true,
            })),
        }
    );
}

#[test]
fn test_env_optionals_stay_none_when_unset() {
    let mut config = Optionals::default();
    load_env("ENVNONE", &mut config).unwrap();
    assert_eq!(config, Optionals::default());
}

#[test]
fn test_env_custom_tag() {
    set_env(&[("ENVTAG_HOST", "localhost"), ("ENVTAG_PORT", "8080")]);

    let mut config = Tagged::default();
    EnvSource::new()
        .with_prefix("ENVTAG")
        .with_tag("mytag")
        .load(&mut config)
        .unwrap();
    assert_eq!(config.not_host, "localhost");
    assert_eq!(config.not_port, 8080);
}

#[test]
fn test_env_embedded() {
    set_env(&[
        ("ENVEMB_HOST", "localhost"),
        ("ENVEMB_PORT", "8080"),
        ("ENVEMB_MAX_IDLE_CONNS", "4"),
    ]);

    let mut config = Embedding::default();
    load_env("ENVEMB", &mut config).unwrap();
    assert_eq!(config.server.host, "localhost");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.conns, 4);
}

#[test]
fn test_env_custom_separator() {
    set_env(&[("ENVSEP_HOSTS", "a;b;c")]);

    let mut config = Lists::default();
    EnvSource::new()
        .with_prefix("ENVSEP")
        .with_separator(";")
        .load(&mut config)
        .unwrap();
    assert_eq!(config.hosts, ["a", "b", "c"]);
}

#[test]
fn test_env_unparseable_scalars() {
    let cases = [
        ("ENVBAD1_BOOL", "not a bool", Shape::Bool),
        ("ENVBAD2_ISIZE", "not an int", Shape::Int { signed: true, bits: isize::BITS }),
        ("ENVBAD3_USIZE", "-1", Shape::Int { signed: false, bits: usize::BITS }),
        ("ENVBAD4_UINT8", "256", Shape::Int { signed: false, bits: 8 }),
        ("ENVBAD5_FLOAT64", "not a float", Shape::Float { bits: 64 }),
        ("ENVBAD6_DURATION", "not a duration", Shape::Duration),
    ];

    for (var, value, want) in cases {
        set_env(&[(var, value)]);
        let prefix = var.split('_').next().unwrap();

        let mut config = AllTypes::default();
        let err = load_env(prefix, &mut config).unwrap_err();
        match err {
            ConfigError::TypeConversion { value: got, shape, .. } => {
                assert_eq!(got, value, "var {var}");
                assert_eq!(shape, want, "var {var}");
            }
            other => panic!("unexpected error for {var}: {other}"),
        }
    }
}

#[test]
fn test_env_conversion_error_keeps_earlier_fields() {
    #[derive(Debug, Default, PartialEq, Configure)]
    struct Listener {
        host: String,
        ssl: bool,
        port: i32,
    }

    set_env(&[
        ("ENVPART_HOST", "h"),
        ("ENVPART_SSL", "not a bool"),
        ("ENVPART_PORT", "8080"),
    ]);

    let mut listener = Listener::default();
    let err = load_env("ENVPART", &mut listener).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::TypeConversion {
            shape: Shape::Bool,
            ..
        }
    ));
    assert_eq!(
        listener,
        Listener {
            host: "h".to_string(),
            ssl: false,
            port: 0,
        }
    );
}

#[cfg(unix)]
#[test]
fn test_env_non_utf8_value_is_read_lossily() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    env::set_var("ENVUTF_HOST", OsStr::from_bytes(b"caf\xe9"));

    let mut server = Server {
        host: "default".to_string(),
        port: 0,
    };
    let writes = load_env("ENVUTF", &mut server).unwrap();
    assert_eq!(writes, 1);
    assert_eq!(server.host, "caf\u{FFFD}");
}

#[test]
fn test_env_unparseable_list_element() {
    set_env(&[
        ("ENVBADL_HOSTS", "localhost,somehost"),
        ("ENVBADL_PORTS", "8080,8081,not an int"),
    ]);

    let mut config = Lists::default();
    let err = load_env("ENVBADL", &mut config).unwrap_err();
    assert!(matches!(err, ConfigError::TypeConversion { .. }));
    assert_eq!(config.hosts, ["localhost", "somehost"]);
}

#[test]
fn test_env_invalid_map_entry() {
    set_env(&[("ENVBADM_HOSTS", "localhost=127.0.0.1,somehost")]);

    let mut config = Maps::default();
    let err = load_env("ENVBADM", &mut config).unwrap_err();
    match err {
        ConfigError::InvalidMapEntry { entry } => assert_eq!(entry, "somehost"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_env_unparseable_map_value() {
    set_env(&[("ENVBADV_PORTS", "localhost=http")]);

    let mut config = Maps::default();
    let err = load_env("ENVBADV", &mut config).unwrap_err();
    assert!(matches!(err, ConfigError::TypeConversion { .. }));
}

#[test]
fn test_env_value_for_struct() {
    set_env(&[("ENVSTRUCT_DB", "postgres://localhost")]);

    let mut config = Nested::default();
    let err = load_env("ENVSTRUCT", &mut config).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnsupportedType {
            shape: Shape::Struct("Db")
        }
    ));
}
