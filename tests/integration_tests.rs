use confdoc::{
    from_str, load, load_with_format, save, save_with_options, to_string, ConfigFile, Error,
    Format, SaveOptions,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(rename_all = "UPPERCASE")]
enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
struct Database {
    /// Host name
    host: String,
    /// Port number
    port: u16,
    user: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
struct Server {
    /// Bind address
    bind: String,
    weight: u32,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
struct AppConfig {
    /// Application name
    name: String,
    /// Logging level
    level: Level,
    /// DB settings
    database: Database,
    /// Upstream servers
    servers: Vec<Server>,
    /// Feature flags
    features: Vec<String>,
    retries: u32,
    replica: Option<Database>,
}

fn sample() -> AppConfig {
    AppConfig {
        name: "app".to_string(),
        level: Level::Info,
        database: Database {
            host: "localhost".to_string(),
            port: 5432,
            user: Some("admin".to_string()),
        },
        servers: vec![
            Server {
                bind: "10.0.0.1:80".to_string(),
                weight: 2,
            },
            Server {
                bind: "10.0.0.2:80".to_string(),
                weight: 1,
            },
        ],
        features: vec!["metrics".to_string(), "tracing".to_string()],
        retries: 3,
        replica: None,
    }
}

fn line_starting<'a>(text: &'a str, prefix: &str) -> &'a str {
    text.lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with {:?} in:\n{}", prefix, text))
}

#[test]
fn test_round_trip_without_comments() {
    let config = sample();
    let options = SaveOptions::new().without_comments();
    for format in [Format::Json, Format::Yaml, Format::Toml] {
        let text =
            confdoc::to_string_with_options(&config, &options.clone().with_format(format)).unwrap();
        assert!(!text.contains('#'), "{} output has a comment:\n{}", format, text);
        let back: AppConfig = from_str(&text, format).unwrap();
        assert_eq!(back, config);
    }
}

#[test]
fn test_round_trip_with_comments() {
    let config = sample();
    for format in [Format::Json, Format::Yaml, Format::Toml] {
        let text = to_string(&config, format).unwrap();
        println!("{}:\n{}", format, text);
        let back: AppConfig = from_str(&text, format).unwrap();
        assert_eq!(back, config);
    }
}

#[test]
fn test_scalar_comment_presence() {
    let config = sample();

    let yaml = to_string(&config, Format::Yaml).unwrap();
    assert_eq!(line_starting(&yaml, "name:"), "name: app  # Application name");

    let toml = to_string(&config, Format::Toml).unwrap();
    assert_eq!(line_starting(&toml, "name ="), "name = \"app\"  # Application name");
}

#[test]
fn test_choice_rendering() {
    let config = sample();
    let yaml = to_string(&config, Format::Yaml).unwrap();
    assert_eq!(
        line_starting(&yaml, "level:"),
        "level: INFO  # Logging level | choices: DEBUG, INFO, WARNING, ERROR"
    );

    let toml = to_string(&config, Format::Toml).unwrap();
    assert_eq!(
        line_starting(&toml, "level ="),
        "level = \"INFO\"  # Logging level | choices: DEBUG, INFO, WARNING, ERROR"
    );
}

#[test]
fn test_container_comment_placement() {
    let config = sample();

    let yaml = to_string(&config, Format::Yaml).unwrap();
    assert_eq!(line_starting(&yaml, "database:"), "database:  # DB settings");
    assert_eq!(yaml.matches("DB settings").count(), 1);
    assert!(yaml.contains("\n  host: localhost  # Host name\n"));

    let toml = to_string(&config, Format::Toml).unwrap();
    assert_eq!(line_starting(&toml, "[database]"), "[database]  # DB settings");
    assert_eq!(toml.matches("DB settings").count(), 1);
    assert!(toml.contains("\nhost = \"localhost\"  # Host name\n"));
}

#[test]
fn test_sequence_comments() {
    let config = sample();

    let yaml = to_string(&config, Format::Yaml).unwrap();
    assert_eq!(line_starting(&yaml, "servers:"), "servers:  # Upstream servers");
    assert_eq!(line_starting(&yaml, "features:"), "features:  # Feature flags");
    assert_eq!(yaml.matches("# Bind address").count(), 2);

    let toml = to_string(&config, Format::Toml).unwrap();
    assert_eq!(
        line_starting(&toml, "features ="),
        "features = [\"metrics\", \"tracing\"]  # Feature flags"
    );
    assert_eq!(toml.matches("[[servers]]").count(), 2);
    assert_eq!(toml.matches("Upstream servers").count(), 1);
    assert_eq!(
        line_starting(&toml, "[[servers]]"),
        "[[servers]]  # Upstream servers"
    );
}

#[test]
fn test_no_spurious_comments() {
    let config = sample();

    let yaml = to_string(&config, Format::Yaml).unwrap();
    assert_eq!(line_starting(&yaml, "retries:"), "retries: 3");
    assert_eq!(line_starting(&yaml, "  user:"), "  user: admin");
    assert_eq!(line_starting(&yaml, "replica:"), "replica: null");

    let toml = to_string(&config, Format::Toml).unwrap();
    assert_eq!(line_starting(&toml, "retries ="), "retries = 3");
    assert_eq!(line_starting(&toml, "weight ="), "weight = 2");
    assert!(!toml.contains("replica"));
}

#[test]
fn test_toml_reorders_tables_yaml_keeps_order() {
    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    struct Ordered {
        a: u32,
        database: Database,
        b: u32,
    }

    let value = Ordered {
        a: 1,
        database: Database {
            host: "db".to_string(),
            port: 1,
            user: None,
        },
        b: 2,
    };

    let yaml = to_string(&value, Format::Yaml).unwrap();
    let top_level: Vec<&str> = yaml
        .lines()
        .filter(|l| !l.starts_with(' '))
        .map(|l| l.split(':').next().unwrap_or_default())
        .collect();
    assert_eq!(top_level, vec!["a", "database", "b"]);

    let toml = to_string(&value, Format::Toml).unwrap();
    let a = toml.find("a = 1").unwrap();
    let b = toml.find("b = 2").unwrap();
    let section = toml.find("[database]").unwrap();
    assert!(a < b && b < section, "unexpected order:\n{}", toml);

    let back: Ordered = from_str(&toml, Format::Toml).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_idempotent_reload() {
    let dir = tempfile::tempdir().unwrap();
    for ext in ["json", "yaml", "yml", "toml"] {
        for comments in [true, false] {
            let path = dir.path().join(format!("app-{}.{}", comments, ext));
            let options = SaveOptions::new().with_comments(comments);

            save_with_options(&sample(), &path, &options).unwrap();
            let first = fs::read_to_string(&path).unwrap();

            let loaded: AppConfig = load(&path).unwrap();
            assert_eq!(loaded, sample());

            save_with_options(&loaded, &path, &options).unwrap();
            let second = fs::read_to_string(&path).unwrap();
            assert_eq!(first, second, "{} (comments: {})", ext, comments);
        }
    }
}

#[test]
fn test_unsupported_extension_fails_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.ini");

    let err = save(&sample(), &path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert!(!path.exists());

    fs::write(&path, "name = app").unwrap();
    let err = load::<AppConfig, _>(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.conf");

    let options = SaveOptions::new().with_format(Format::Toml);
    save_with_options(&sample(), &path, &options).unwrap();

    let loaded: AppConfig = load_with_format(&path, Format::Toml).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn test_overwrite_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, "keep me\n").unwrap();

    let options = SaveOptions::new().with_overwrite(false);
    let err = save_with_options(&sample(), &path, &options).unwrap_err();
    assert!(matches!(err, Error::FileExists(ref p) if p == &path));
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me\n");

    save(&sample(), &path).unwrap();
    assert_ne!(fs::read_to_string(&path).unwrap(), "keep me\n");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load::<AppConfig, _>(dir.path().join("absent.toml")).unwrap_err();
    match err {
        Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn test_validation_errors_surface_unwrapped() {
    let yaml = to_string(&sample(), Format::Yaml).unwrap();
    let broken = yaml.replace("port: 5432", "port: not-a-port");

    let err = from_str::<AppConfig>(&broken, Format::Yaml).unwrap_err();
    assert!(err.is_validation());

    let direct = serde_yaml::from_str::<AppConfig>(&broken).unwrap_err();
    assert_eq!(err.to_string(), direct.to_string());
}

#[test]
fn test_hand_edited_comments_are_ignored() {
    let text = "\
# top of file
name: app  # renamed by hand
level: DEBUG
database:
  host: db  # moved
  port: 1
servers: []
features: []
retries: 0
";
    let config: AppConfig = from_str(text, Format::Yaml).unwrap();
    assert_eq!(config.level, Level::Debug);
    assert_eq!(config.database.user, None);
    assert_eq!(config.replica, None);

    let regenerated = to_string(&config, Format::Yaml).unwrap();
    assert!(!regenerated.contains("renamed by hand"));
    assert!(regenerated.contains("name: app  # Application name"));
}

#[test]
fn test_config_file_trait() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.toml");

    sample().save(&path).unwrap();
    let loaded = AppConfig::load(&path).unwrap();
    assert_eq!(loaded, sample());

    let text = loaded.to_config_string(Format::Yaml).unwrap();
    assert_eq!(AppConfig::from_config_str(&text, Format::Yaml).unwrap(), loaded);

    let yaml_path = dir.path().join("app.yaml");
    loaded
        .save_with_options(&yaml_path, &SaveOptions::new().without_comments())
        .unwrap();
    assert_eq!(
        AppConfig::load_with_format(&yaml_path, Format::Yaml).unwrap(),
        loaded
    );
}

#[test]
fn test_object_or_list_field_is_unsupported() {
    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Server),
        Many(Vec<Server>),
    }

    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    struct Upstreams {
        /// Targets
        targets: OneOrMany,
    }

    let value = Upstreams {
        targets: OneOrMany::One(Server {
            bind: "a".to_string(),
            weight: 1,
        }),
    };

    let err = to_string(&value, Format::Yaml).unwrap_err();
    assert!(matches!(err, Error::UnsupportedShape { ref path, .. } if path == "targets"));

    let options = SaveOptions::new().with_format(Format::Yaml).without_comments();
    let plain = confdoc::to_string_with_options(&value, &options).unwrap();
    assert_eq!(from_str::<Upstreams>(&plain, Format::Yaml).unwrap(), value);
}

#[test]
fn test_tagged_enum_field() {
    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    enum Backend {
        Memory,
        Disk { path: String },
    }

    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    struct Store {
        /// Storage backend
        backend: Backend,
    }

    let memory = Store {
        backend: Backend::Memory,
    };
    for format in [Format::Yaml, Format::Toml] {
        let text = to_string(&memory, format).unwrap();
        assert_eq!(text.matches("Storage backend").count(), 1, "{}", text);
        assert_eq!(from_str::<Store>(&text, format).unwrap(), memory);
    }

    let disk = Store {
        backend: Backend::Disk {
            path: "/var/lib/app".to_string(),
        },
    };
    let yaml = to_string(&disk, Format::Yaml).unwrap();
    assert_eq!(
        yaml,
        "backend:  # Storage backend\n  Disk:\n    path: /var/lib/app\n"
    );

    let toml = to_string(&disk, Format::Toml).unwrap();
    assert_eq!(
        toml,
        "[backend]  # Storage backend\n\n[backend.Disk]\npath = \"/var/lib/app\"\n"
    );
    assert_eq!(from_str::<Store>(&toml, Format::Toml).unwrap(), disk);
}

#[test]
fn test_layout_same_without_comments() {
    let config = sample();
    for format in [Format::Yaml, Format::Toml] {
        let commented = to_string(&config, format).unwrap();
        let options = SaveOptions::new().with_format(format).without_comments();
        let plain = confdoc::to_string_with_options(&config, &options).unwrap();

        let stripped: String = commented
            .lines()
            .map(|line| match line.find("  # ") {
                Some(at) => &line[..at],
                None => line,
            })
            .map(|line| format!("{}\n", line))
            .collect();
        assert_eq!(plain, stripped, "{}", format);
    }

    let options = SaveOptions::new().with_format(Format::Yaml).without_comments();
    let plain = confdoc::to_string_with_options(&config, &options).unwrap();
    assert!(plain.contains("features:\n  - metrics\n  - tracing\n"), "{}", plain);
}

#[test]
fn test_number_and_bool_map_keys() {
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    struct Ports {
        /// Port names
        names: BTreeMap<u32, String>,
        /// Feature switches
        switches: BTreeMap<bool, u8>,
    }

    let ports = Ports {
        names: BTreeMap::from([(80, "http".to_string()), (443, "https".to_string())]),
        switches: BTreeMap::from([(true, 1)]),
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ports.yaml");
    save(&ports, &path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "names:  # Port names\n  80: http\n  443: https\n\
         switches:  # Feature switches\n  true: 1\n"
    );
    assert_eq!(load::<Ports, _>(&path).unwrap(), ports);

    let options = SaveOptions::new().with_format(Format::Yaml).without_comments();
    let plain = confdoc::to_string_with_options(&ports, &options).unwrap();
    assert_eq!(from_str::<Ports>(&plain, Format::Yaml).unwrap(), ports);

    let err = to_string(&ports, Format::Toml).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn test_unicode_line_separators_round_trip() {
    #[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
    struct Motd {
        /// Message
        text: String,
    }

    let motd = Motd {
        text: "caf\u{e9}\u{2028}next\u{2029}para\u{85}end".to_string(),
    };
    for format in [Format::Json, Format::Yaml, Format::Toml] {
        let text = to_string(&motd, format).unwrap();
        assert_eq!(from_str::<Motd>(&text, format).unwrap(), motd, "{}", format);
    }

    let toml = to_string(&motd, Format::Toml).unwrap();
    assert!(!toml.contains('\u{2028}'), "{}", toml);
    let yaml = to_string(&motd, Format::Yaml).unwrap();
    assert_eq!(
        yaml,
        "text: \"caf\u{e9}\\u2028next\\u2029para\\u0085end\"  # Message\n"
    );
}
