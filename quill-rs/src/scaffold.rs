//! Scaffolding: append a message and its conventionally named handler to a context directory.
//!
//! `add_message(root, "blog", "FeaturePost", MessageKind::Command, None)` appends to
//! `blog/commands.rs` and `blog/handlers.rs` and makes sure `blog/mod.rs` declares both modules.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use quill_core::{conventional_handler_name, MessageKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("invalid context name {0:?} (expected snake_case)")]
    InvalidContext(String),
    #[error("invalid message name {0:?} (expected PascalCase)")]
    InvalidName(String),
    #[error("{name} already exists in {file}")]
    AlreadyExists { name: String, file: PathBuf },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What `add_message` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
    pub message_file: PathBuf,
    pub handler_file: PathBuf,
    /// Handler path relative to the crate root, e.g. `blog::handlers::FeaturePostHandler`.
    pub handler: String,
    /// Line to add to the context's `Module::register_into`.
    pub registration: String,
}

const COMMAND_TEMPLATE: &str = r#"
#[derive(Clone, Debug, Serialize, Deserialize, Command)]
#[command(output = {{output}})]
pub struct {{name}} {}
"#;

const QUERY_TEMPLATE: &str = r#"
#[derive(Clone, Debug, Serialize, Deserialize, Query)]
#[query(output = {{output}})]
pub struct {{name}} {}
"#;

const HANDLER_TEMPLATE: &str = r#"
pub struct {{handler}};

#[quill_rs::async_trait]
impl quill_rs::{{trait}}<super::{{module}}::{{name}}> for {{handler}} {
    async fn handle(
        &self,
        _message: super::{{module}}::{{name}},
    ) -> Result<{{output}}, quill_rs::DispatchError> {
        Err(quill_rs::DispatchError::Configuration(
            "{{handler}} is not implemented".into(),
        ))
    }
}
"#;

fn is_snake_case(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_pascal_case(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Whether `source` already declares a struct named `ident`.
fn declares(source: &str, ident: &str) -> bool {
    let needle = format!("pub struct {}", ident);
    source.match_indices(&needle).any(|(at, _)| {
        source[at + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

fn render(template: &str, pairs: &[(&str, &str)]) -> String {
    pairs.iter().fold(template.to_owned(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}

fn read_or_empty(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

/// Append `text` to `path`, writing `header` first when the file is new.
fn append(path: &Path, header: &str, text: &str) -> io::Result<()> {
    let is_new = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if is_new {
        file.write_all(header.as_bytes())?;
    }
    file.write_all(text.as_bytes())
}

fn ensure_mod_decls(dir: &Path, modules: &[&str]) -> io::Result<()> {
    let path = dir.join("mod.rs");
    let existing = read_or_empty(&path)?;
    let missing: String = modules
        .iter()
        .filter(|m| !existing.contains(&format!("mod {};", m)))
        .map(|m| format!("pub mod {};\n", m))
        .collect();
    if !missing.is_empty() {
        append(&path, "", &missing)?;
    }
    Ok(())
}

/// Scaffold message `name` of `kind` into `<root>/<context>/`. `output` defaults to `()`.
pub fn add_message(
    root: &Path,
    context: &str,
    name: &str,
    kind: MessageKind,
    output: Option<&str>,
) -> Result<Scaffolded, ScaffoldError> {
    if !is_snake_case(context) {
        return Err(ScaffoldError::InvalidContext(context.to_owned()));
    }
    if !is_pascal_case(name) {
        return Err(ScaffoldError::InvalidName(name.to_owned()));
    }
    let (module, template, handler_trait, imports) = match kind {
        MessageKind::Command => (
            "commands",
            COMMAND_TEMPLATE,
            "CommandHandler",
            "use serde::{Deserialize, Serialize};\n\nuse quill_rs::Command;\n",
        ),
        MessageKind::Query => (
            "queries",
            QUERY_TEMPLATE,
            "QueryHandler",
            "use serde::{Deserialize, Serialize};\n\nuse quill_rs::Query;\n",
        ),
    };
    let output = output.unwrap_or("()");

    let dir = root.join(context);
    fs::create_dir_all(&dir)?;
    let message_file = dir.join(format!("{}.rs", module));
    let handler_file = dir.join("handlers.rs");

    let handler = conventional_handler_name(&format!("{}::{}::{}", context, module, name));
    let handler_ident = handler.rsplit("::").next().unwrap_or(&handler).to_owned();

    if declares(&read_or_empty(&message_file)?, name) {
        return Err(ScaffoldError::AlreadyExists {
            name: name.to_owned(),
            file: message_file,
        });
    }
    if declares(&read_or_empty(&handler_file)?, &handler_ident) {
        return Err(ScaffoldError::AlreadyExists {
            name: handler_ident,
            file: handler_file,
        });
    }

    let pairs = [
        ("name", name),
        ("output", output),
        ("module", module),
        ("trait", handler_trait),
        ("handler", handler_ident.as_str()),
    ];
    append(&message_file, imports, &render(template, &pairs))?;
    append(&handler_file, "", &render(HANDLER_TEMPLATE, &pairs))?;
    ensure_mod_decls(&dir, &[module, "handlers"])?;

    let registration = format!(
        "container.register_{kind}_handler::<{module}::{name}, handlers::{h}, _>(|_| Ok(handlers::{h}));",
        kind = kind,
        module = module,
        name = name,
        h = handler_ident,
    );
    Ok(Scaffolded {
        message_file,
        handler_file,
        handler,
        registration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_checks() {
        assert!(is_snake_case("blog_admin"));
        assert!(!is_snake_case("Blog"));
        assert!(is_pascal_case("FeaturePost"));
        assert!(!is_pascal_case("feature_post"));
        assert!(!is_pascal_case("Feature-Post"));
    }

    #[test]
    fn declares_matches_whole_identifiers() {
        let src = "pub struct FeaturePostHandler;\npub struct Other {}";
        assert!(declares(src, "FeaturePostHandler"));
        assert!(declares(src, "Other"));
        assert!(!declares(src, "FeaturePost"));
    }
}
