//! Integration tests for seedbed-core.
//!
//! These drive the public API end to end with an in-test catalog and
//! filesystem; the built-in templates are covered in seedbed-adapters.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use seedbed_core::{
    application::ApplicationError,
    domain::{DomainError, registry},
    prelude::*,
};

#[derive(Clone, Default)]
struct RecordingFs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    fail_on: Option<PathBuf>,
}

impl RecordingFs {
    fn read(&self, path: &str) -> String {
        self.files.lock().unwrap()[Path::new(path)].clone()
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

impl Filesystem for RecordingFs {
    fn create_dir_all(&self, _path: &Path) -> SeedbedResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SeedbedResult<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(ApplicationError::WriteFailed {
                path: path.to_path_buf(),
                reason: "injected".into(),
            }
            .into());
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

struct InlineCatalog;

const CONFIG: &str = "\
production:
  adapter: {{DATABASE_ADAPTER}}
{{#if network_service}}
  host: <%= ENV.fetch(\"{{DATABASE_HOST_ENV}}\") { \"{{DATABASE_HOST_DEFAULT}}\" } %>
  username: <%= ENV.fetch(\"{{DATABASE_USERNAME_ENV}}\") { \"{{DATABASE_USERNAME_DEFAULT}}\" } %>
{{#else}}
  database: db/production.sqlite3
{{/if}}
";

const ENV: &str = "\
DATABASE_ADAPTER={{DATABASE_ADAPTER}}
SECRET_KEY_BASE={{SECRET_KEY_BASE}}
{{#if network_service}}
{{DATABASE_HOST_ENV}}={{DATABASE_HOST_DEFAULT}}
{{DATABASE_USERNAME_ENV}}={{DATABASE_USERNAME_DEFAULT}}
{{/if}}
";

const COMPOSE: &str = "\
services:
  web:
    build: .
{{#if network_service}}
    depends_on:
      - db
  db:
    image: {{DATABASE_IMAGE}}
    ports:
      - \"{{DATABASE_SERVICE_PORT}}:{{DATABASE_SERVICE_PORT}}\"
{{/if}}
";

impl ArtifactCatalog for InlineCatalog {
    fn specs(&self) -> SeedbedResult<Vec<ArtifactSpec>> {
        Ok(vec![
            ArtifactSpec::parse("config/database.yml", ArtifactKind::DataStoreConfig, CONFIG)?,
            ArtifactSpec::parse(".env", ArtifactKind::EnvFile, ENV)?,
            ArtifactSpec::parse("docker-compose.yml", ArtifactKind::Orchestration, COMPOSE)?,
        ])
    }
}

fn run(choice: &str) -> (GenerationReport, RecordingFs) {
    let fs = RecordingFs::default();
    let service = GenerateService::new(Box::new(InlineCatalog), Box::new(fs.clone()));
    let report = service.generate(choice, "my-shop", "/out").unwrap();
    (report, fs)
}

#[test]
fn registry_is_consistent() {
    registry::verify().unwrap();
}

#[test]
fn postgres_choice_propagates_to_every_artifact() {
    let (report, fs) = run("postgresql");

    assert_eq!(report.variant, Variant::Postgresql);
    assert!(report.warnings.is_empty());

    let config = fs.read("/out/config/database.yml");
    let env = fs.read("/out/.env");
    let compose = fs.read("/out/docker-compose.yml");

    assert!(config.contains("adapter: postgresql"));
    assert!(config.contains("ENV.fetch(\"POSTGRES_HOST\") { \"localhost\" }"));
    assert!(env.contains("POSTGRES_HOST=localhost\n"));
    assert!(env.contains("POSTGRES_USER=postgres\n"));
    assert!(compose.contains("image: postgres:16-alpine"));
    assert!(compose.contains("\"5432:5432\""));
}

#[test]
fn sqlite_choice_has_no_service_anywhere() {
    let (report, fs) = run("sqlite3");

    assert_eq!(report.variant, Variant::Sqlite);

    let config = fs.read("/out/config/database.yml");
    let compose = fs.read("/out/docker-compose.yml");

    assert!(config.contains("adapter: sqlite3"));
    assert!(config.contains("database: db/production.sqlite3"));
    assert!(!config.contains("host:"));
    assert!(!compose.contains("db:"));
    assert!(!fs.read("/out/.env").contains("HOST"));
}

#[test]
fn unknown_choice_renders_the_default_and_warns() {
    let (fallback, fallback_fs) = run("oracle");
    let (_, sqlite_fs) = run("sqlite3");

    assert_eq!(fallback.variant, Variant::Sqlite);
    assert_eq!(fallback.warnings.len(), 1);
    assert_eq!(
        fallback_fs.read("/out/config/database.yml"),
        sqlite_fs.read("/out/config/database.yml")
    );
}

#[test]
fn credential_keys_agree_between_config_and_env() {
    for variant in Variant::ALL {
        let (_, fs) = run(variant.as_str());
        let params = parameters_for(variant);
        let config = fs.read("/out/config/database.yml");
        let env = fs.read("/out/.env");

        if let Some(service) = params.service {
            for credential in service.credentials {
                let line = format!("{}={}\n", credential.env_var, credential.default);
                let fetch = format!(
                    "ENV.fetch(\"{}\") {{ \"{}\" }}",
                    credential.env_var, credential.default
                );
                let referenced = config.contains(&format!("\"{}\"", credential.env_var));
                if referenced {
                    assert!(config.contains(&fetch), "{variant}: {fetch}");
                    assert!(env.contains(&line), "{variant}: {line}");
                }
            }
        }
    }
}

#[test]
fn secret_is_fresh_per_run() {
    let (_, first) = run("mysql");
    let (_, second) = run("mysql");

    let secret = |fs: &RecordingFs| {
        fs.read("/out/.env")
            .lines()
            .find_map(|l| l.strip_prefix("SECRET_KEY_BASE=").map(str::to_string))
            .unwrap()
    };

    assert_eq!(secret(&first).len(), 128);
    assert_ne!(secret(&first), secret(&second));
}

#[test]
fn written_paths_follow_registration_order() {
    let (report, fs) = run("mysql");

    assert_eq!(
        report.written,
        [
            PathBuf::from("/out/config/database.yml"),
            PathBuf::from("/out/.env"),
            PathBuf::from("/out/docker-compose.yml"),
        ]
    );
    assert_eq!(fs.paths().len(), 3);
    assert_eq!(report.state, RunState::Done);
}

#[test]
fn write_failure_names_the_artifact_and_keeps_earlier_files() {
    let fs = RecordingFs {
        fail_on: Some(PathBuf::from("/out/.env")),
        ..Default::default()
    };
    let service = GenerateService::new(Box::new(InlineCatalog), Box::new(fs.clone()));

    let err = service.generate("postgresql", "my-shop", "/out").unwrap_err();

    match err {
        SeedbedError::Application(ApplicationError::WriteFailed { path, .. }) => {
            assert_eq!(path, PathBuf::from("/out/.env"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs.paths(), [PathBuf::from("/out/config/database.yml")]);
}

#[test]
fn every_built_template_renders_identically_twice() {
    let specs = InlineCatalog.specs().unwrap();
    for variant in Variant::ALL {
        let ctx = RenderContext::new("shop", parameters_for(variant)).with_secret("s");
        for spec in &specs {
            assert_eq!(spec.template.render(&ctx), spec.template.render(&ctx));
        }
    }
}

#[test]
fn partial_variant_switch_is_a_coverage_gap() {
    let template = Template::parse(
        "bad",
        "{{#if variant == postgresql}}a{{#elif variant == mysql}}b{{/if}}",
    )
    .unwrap();

    assert!(matches!(
        template.check_coverage(),
        Err(DomainError::TemplateCoverageGap { .. })
    ));
}
