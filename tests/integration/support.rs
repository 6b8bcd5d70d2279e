use metapush::config::MetapushConfig;
use metapush::tooling::{CliContext, MergeArgs};
use metapush::Template;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEMPLATE_YAML: &str = "\
tables:
  - name: sites
    fields:
      - name: id
        type: integer
        description: template id
      - name: lat
        type: float
  - name: plots
    fields:
      - name: area
        type: float
";

/// Context with built-in defaults, independent of the user's config files.
pub fn context() -> CliContext {
    CliContext::with_config(MetapushConfig::default(), None)
}

pub fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

pub struct Workspace {
    pub dir: TempDir,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let template = write_file(dir.path(), "template.yaml", TEMPLATE_YAML);
        let output = dir.path().join("merged.json");
        Self {
            dir,
            template,
            output,
        }
    }

    pub fn content(&self, name: &str, text: &str) -> PathBuf {
        write_file(self.dir.path(), name, text)
    }

    pub fn args(&self, content: Vec<PathBuf>) -> MergeArgs {
        MergeArgs {
            template: self.template.clone(),
            content,
            output: self.output.clone(),
            overwrite: false,
            tables: None,
            data: None,
            no_template_attributes: false,
        }
    }

    pub fn read_output(&self) -> Template {
        serde_json::from_str(&fs::read_to_string(&self.output).unwrap()).unwrap()
    }
}
