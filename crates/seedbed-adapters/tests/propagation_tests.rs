//! End-to-end tests over the built-in templates.
//!
//! Every artifact that mentions a variant-derived value must agree with every
//! other artifact, for every registered variant.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use seedbed_adapters::{BuiltinCatalog, DirectoryCatalog, LocalFilesystem, MemoryFilesystem};
use seedbed_core::{
    application::{ArtifactSetBuilder, GenerateService, RunState},
    domain::{
        ArtifactKind, CredentialRole, DomainError, RenderContext, RenderedArtifact, Variant,
        parameters_for,
    },
    error::SeedbedError,
};
use tempfile::TempDir;

// ── helpers ───────────────────────────────────────────────────────────────

fn builder() -> ArtifactSetBuilder {
    ArtifactSetBuilder::from_catalog(&BuiltinCatalog::new()).unwrap()
}

fn render(variant: Variant) -> Vec<RenderedArtifact> {
    let ctx = RenderContext::new("my-shop", parameters_for(variant))
        .with_secret("f".repeat(128))
        .with_year(2026);
    builder().build(&ctx).unwrap()
}

fn artifact(artifacts: &[RenderedArtifact], kind: ArtifactKind) -> &str {
    &artifacts
        .iter()
        .find(|a| a.kind == kind)
        .unwrap_or_else(|| panic!("no {kind} artifact"))
        .content
}

/// `key: value` pairs of the `production:` block of database.yml.
fn production_block(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .skip_while(|l| *l != "production:")
        .skip(1)
        .take_while(|l| l.starts_with("  "))
        .filter_map(|l| l.trim().split_once(": "))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn production_value(config: &str, key: &str) -> Option<String> {
    production_block(config)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

fn env_value(env: &str, key: &str) -> Option<String> {
    env.lines()
        .find_map(|l| l.strip_prefix(&format!("{key}=")).map(str::to_string))
}

fn compose_value(compose: &str, key: &str) -> Option<String> {
    compose
        .lines()
        .find_map(|l| l.trim().strip_prefix(&format!("{key}: ")).map(str::to_string))
}

const CONNECTION_KEYS: [&str; 4] = ["host", "port", "username", "password"];

// ── cardinality and determinism ───────────────────────────────────────────

#[test]
fn every_variant_builds_one_artifact_per_spec() {
    let specs = builder().specs().len();
    for variant in Variant::ALL {
        assert_eq!(render(variant).len(), specs, "{variant}");
    }
}

#[test]
fn rendering_is_byte_identical_for_identical_inputs() {
    for variant in Variant::ALL {
        assert_eq!(render(variant), render(variant), "{variant}");
    }
}

#[test]
fn no_placeholder_survives_rendering() {
    for variant in Variant::ALL {
        for a in render(variant) {
            assert!(!a.content.contains("{{"), "{variant} {}", a.path.display());
        }
    }
}

// ── consistency ───────────────────────────────────────────────────────────

#[test]
fn adapter_agrees_between_config_and_env() {
    for variant in Variant::ALL {
        let artifacts = render(variant);
        let params = parameters_for(variant);

        let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);
        let env = artifact(&artifacts, ArtifactKind::EnvFile);

        assert_eq!(production_value(config, "adapter").as_deref(), Some(params.adapter));
        assert_eq!(env_value(env, "DATABASE_ADAPTER").as_deref(), Some(params.adapter));
    }
}

#[test]
fn credentials_agree_across_config_env_and_compose() {
    for variant in Variant::ALL {
        let Some(service) = parameters_for(variant).service else {
            continue;
        };
        let artifacts = render(variant);
        let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);
        let env = artifact(&artifacts, ArtifactKind::EnvFile);
        let compose = artifact(&artifacts, ArtifactKind::Orchestration);

        for credential in service.credentials {
            let key = credential.role.as_str();
            let expected =
                format!("<%= ENV.fetch(\"{}\") {{ \"{}\" }} %>", credential.env_var, credential.default);
            assert_eq!(production_value(config, key), Some(expected), "{variant} {key}");

            assert_eq!(
                env_value(env, credential.env_var).as_deref(),
                Some(credential.default),
                "{variant} {key}"
            );
        }

        for role in [CredentialRole::Username, CredentialRole::Password] {
            let Some(credential) = service.credential(role) else {
                panic!("{variant} has no {role:?}");
            };
            assert_eq!(
                compose_value(compose, credential.env_var),
                Some(format!("${{{}:-{}}}", credential.env_var, credential.default)),
                "{variant} {role:?}"
            );
        }
    }
}

#[test]
fn database_name_agrees_across_config_env_and_compose() {
    for variant in [Variant::Postgresql, Variant::Mysql] {
        let Some(service) = parameters_for(variant).service else {
            panic!("{variant} has no service");
        };
        let artifacts = render(variant);
        let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);
        let env = artifact(&artifacts, ArtifactKind::EnvFile);
        let compose = artifact(&artifacts, ArtifactKind::Orchestration);

        let env_name = service.database_env;
        assert_eq!(env_value(env, env_name).as_deref(), Some("my_shop_production"));
        assert_eq!(
            compose_value(compose, env_name),
            Some(format!("${{{env_name}:-my_shop_production}}"))
        );
        assert!(
            production_value(config, "database")
                .is_some_and(|v| v.contains(env_name) && v.contains("my_shop_production"))
        );
    }
}

#[test]
fn service_port_agrees_between_compose_and_config_default() {
    for variant in [Variant::Postgresql, Variant::Mysql] {
        let Some(service) = parameters_for(variant).service else {
            panic!("{variant} has no service");
        };
        let artifacts = render(variant);
        let compose = artifact(&artifacts, ArtifactKind::Orchestration);
        let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);

        let mapping = format!("- \"{0}:{0}\"", service.port);
        assert!(compose.contains(&mapping), "{variant}: {mapping}");
        assert!(
            production_value(config, "port").is_some_and(|v| v.contains(&format!("\"{}\"", service.port))),
            "{variant}"
        );
    }
}

#[test]
fn secret_is_shared_by_nothing_but_env() {
    for variant in Variant::ALL {
        let artifacts = render(variant);
        let secret = "f".repeat(128);
        let holders: Vec<_> = artifacts
            .iter()
            .filter(|a| a.content.contains(&secret))
            .map(|a| a.kind)
            .collect();
        assert_eq!(holders, [ArtifactKind::EnvFile]);
    }
}

// ── production block key sets ─────────────────────────────────────────────

#[test]
fn file_based_production_block_has_no_connection_keys() {
    let artifacts = render(Variant::Sqlite);
    let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);
    let keys: BTreeSet<_> = production_block(config).into_iter().map(|(k, _)| k).collect();

    for key in CONNECTION_KEYS {
        assert!(!keys.contains(key), "sqlite production has {key}");
    }
    assert_eq!(
        production_value(config, "database").as_deref(),
        Some("db/production.sqlite3")
    );
}

#[test]
fn network_production_block_has_the_full_connection_key_set() {
    for variant in [Variant::Postgresql, Variant::Mysql] {
        let artifacts = render(variant);
        let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);
        let keys: BTreeSet<_> = production_block(config).into_iter().map(|(k, _)| k).collect();

        for key in CONNECTION_KEYS {
            assert!(keys.contains(key), "{variant} production lacks {key}");
        }
    }
}

#[test]
fn shared_environments_stay_file_based() {
    for variant in Variant::ALL {
        let artifacts = render(variant);
        let config = artifact(&artifacts, ArtifactKind::DataStoreConfig);
        assert!(config.contains("default: &default\n  adapter: sqlite3\n"));
        assert!(config.contains("database: db/development.sqlite3"));
        assert!(config.contains("database: db/test.sqlite3"));
    }
}

#[test]
fn encoding_follows_the_variant() {
    let pg = render(Variant::Postgresql);
    let my = render(Variant::Mysql);

    assert_eq!(
        production_value(artifact(&pg, ArtifactKind::DataStoreConfig), "encoding").as_deref(),
        Some("unicode")
    );
    assert_eq!(
        production_value(artifact(&my, ArtifactKind::DataStoreConfig), "encoding").as_deref(),
        Some("utf8mb4")
    );
}

// ── orchestration ─────────────────────────────────────────────────────────

#[test]
fn sqlite_compose_has_no_data_service() {
    let artifacts = render(Variant::Sqlite);
    let compose = artifact(&artifacts, ArtifactKind::Orchestration);

    assert!(!compose.contains("  db:"));
    assert!(!compose.contains("image:"));
    assert!(!compose.contains("depends_on"));
    assert!(compose.contains("- ./db:/app/db"));
}

#[test]
fn network_compose_points_web_at_the_db_service() {
    for variant in [Variant::Postgresql, Variant::Mysql] {
        let Some(service) = parameters_for(variant).service else {
            panic!("{variant} has no service");
        };
        let Some(host) = service.credential(CredentialRole::Host) else {
            panic!("{variant} has no host");
        };
        let artifacts = render(variant);
        let compose = artifact(&artifacts, ArtifactKind::Orchestration);

        assert_eq!(compose_value(compose, host.env_var).as_deref(), Some("db"));
        assert!(compose.contains("depends_on:\n      - db\n"));
        assert!(compose.contains(&format!("- db_data:{}", service.data_dir)));
    }
}

#[test]
fn only_mysql_sets_a_random_root_password() {
    let my = render(Variant::Mysql);
    let pg = render(Variant::Postgresql);

    assert!(artifact(&my, ArtifactKind::Orchestration).contains("MYSQL_RANDOM_ROOT_PASSWORD"));
    assert!(!artifact(&pg, ArtifactKind::Orchestration).contains("MYSQL_RANDOM_ROOT_PASSWORD"));
}

#[test]
fn dockerfile_is_identical_for_every_variant() {
    let dockerfiles: BTreeSet<_> = Variant::ALL
        .iter()
        .map(|v| artifact(&render(*v), ArtifactKind::ContainerBuild).to_string())
        .collect();
    assert_eq!(dockerfiles.len(), 1);
}

// ── end-to-end scenarios ──────────────────────────────────────────────────

fn generate(choice: &str) -> (seedbed_core::application::GenerationReport, MemoryFilesystem) {
    let fs = MemoryFilesystem::new();
    let service = GenerateService::new(Box::new(BuiltinCatalog::new()), Box::new(fs.clone()));
    let report = service.generate(choice, "my-shop", "/work/my-shop").unwrap();
    (report, fs)
}

fn read(fs: &MemoryFilesystem, rel: &str) -> String {
    fs.read_file(&Path::new("/work/my-shop").join(rel))
        .unwrap_or_else(|| panic!("{rel} not written"))
}

#[test]
fn postgres_choice_sets_image_and_production_adapter() {
    let (report, fs) = generate("postgresql");

    assert_eq!(report.variant, Variant::Postgresql);
    assert_eq!(
        compose_value(&read(&fs, "docker-compose.yml"), "image").as_deref(),
        Some("postgres:16-alpine")
    );
    assert_eq!(
        production_value(&read(&fs, "config/database.yml"), "adapter").as_deref(),
        Some("postgresql")
    );
}

#[test]
fn padded_mixed_case_choice_resolves_to_mysql() {
    let (report, fs) = generate("  MySQL  ");

    assert_eq!(report.variant, Variant::Mysql);
    assert!(report.warnings.is_empty());
    assert_eq!(
        production_value(&read(&fs, "config/database.yml"), "adapter").as_deref(),
        Some("mysql2")
    );
}

#[test]
fn unsupported_choice_falls_back_and_still_completes() {
    let (report, fs) = generate("oracle");

    assert_eq!(report.variant, Variant::Sqlite);
    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.warnings.len(), 1);
    assert!(!read(&fs, "docker-compose.yml").contains("image:"));
}

#[test]
fn written_paths_match_the_builtin_registration_order() {
    let (report, fs) = generate("mysql");
    let root = PathBuf::from("/work/my-shop");

    let expected: Vec<_> = [
        "config/database.yml",
        ".env",
        "Dockerfile",
        "docker-compose.yml",
        "LICENSE",
        "README.md",
    ]
    .iter()
    .map(|p| root.join(p))
    .collect();

    assert_eq!(report.written, expected);
    assert_eq!(fs.list_files().len(), expected.len());
}

#[test]
fn write_failure_stops_the_run_and_names_the_artifact() {
    let fs = MemoryFilesystem::new();
    fs.fail_on("/work/my-shop/Dockerfile").unwrap();
    let service = GenerateService::new(Box::new(BuiltinCatalog::new()), Box::new(fs.clone()));

    let err = service.generate("postgresql", "my-shop", "/work/my-shop").unwrap_err();

    assert!(err.to_string().contains("/work/my-shop/Dockerfile"));
    assert!(fs.read_file(Path::new("/work/my-shop/.env")).is_some());
    assert!(fs.read_file(Path::new("/work/my-shop/docker-compose.yml")).is_none());
}

// ── on disk ───────────────────────────────────────────────────────────────

#[test]
fn rerun_fully_replaces_previous_artifacts() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("my-shop");

    let service = GenerateService::new(Box::new(BuiltinCatalog::new()), Box::new(LocalFilesystem::new()));
    service.generate("postgresql", "my-shop", &root).unwrap();

    let env_path = root.join(".env");
    let first_env = std::fs::read_to_string(&env_path).unwrap();
    std::fs::write(root.join("config/database.yml"), "stale: true\n".repeat(100)).unwrap();

    service.generate("sqlite3", "my-shop", &root).unwrap();

    let config = std::fs::read_to_string(root.join("config/database.yml")).unwrap();
    let env = std::fs::read_to_string(&env_path).unwrap();

    assert!(!config.contains("stale"));
    assert_eq!(production_value(&config, "adapter").as_deref(), Some("sqlite3"));
    assert!(!env.contains("POSTGRES_"));
    assert_ne!(
        env_value(&first_env, "SECRET_KEY_BASE"),
        env_value(&env, "SECRET_KEY_BASE")
    );
    assert_eq!(std::fs::read_dir(root.join("config")).unwrap().count(), 1);
}

#[test]
fn custom_catalog_cannot_write_outside_the_project() {
    let temp = TempDir::new().unwrap();
    let templates = temp.path().join("templates");
    std::fs::create_dir(&templates).unwrap();
    std::fs::write(
        templates.join("artifacts.toml"),
        "[[artifact]]\npath = \"../escaped.txt\"\nkind = \"readme\"\ntemplate = \"r.tmpl\"\n",
    )
    .unwrap();
    std::fs::write(templates.join("r.tmpl"), "# {{PROJECT_NAME}}\n").unwrap();

    let service = GenerateService::new(
        Box::new(DirectoryCatalog::new(&templates)),
        Box::new(LocalFilesystem::new()),
    );
    let err = service
        .generate("sqlite3", "shop", temp.path().join("shop"))
        .unwrap_err();

    assert!(matches!(
        err,
        SeedbedError::Domain(DomainError::PathEscapesRoot { .. })
    ));
    assert!(!temp.path().join("escaped.txt").exists());
    assert!(!temp.path().join("shop").exists());
}
