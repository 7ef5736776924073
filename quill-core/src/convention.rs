//! Naming convention: `app::blog::commands::CreatePost` is handled by `app::blog::handlers::CreatePostHandler`.

/// Suffix appended to the message type name.
pub const HANDLER_SUFFIX: &str = "Handler";

/// Derive the conventional handler type name from a fully-qualified message type name.
///
/// Path segments `commands`/`queries` become `handlers` (`Commands`/`Queries` become `Handlers`),
/// then `Handler` is appended. Rust paths (`::`) and dotted paths (`.`) are both accepted.
/// Pure string transform; whether the result is registered is checked elsewhere.
pub fn conventional_handler_name(message_type: &str) -> String {
    let separator = if message_type.contains("::") { "::" } else { "." };
    let path = message_type
        .split(separator)
        .map(|segment| match segment {
            "commands" | "queries" => "handlers",
            "Commands" | "Queries" => "Handlers",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(separator);
    format!("{}{}", path, HANDLER_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::conventional_handler_name;

    #[test]
    fn substitution_table() {
        let cases = [
            ("A.B.Commands.CreateX", "A.B.Handlers.CreateXHandler"),
            ("A.B.Queries.GetX", "A.B.Handlers.GetXHandler"),
            ("app::blog::commands::CreatePost", "app::blog::handlers::CreatePostHandler"),
            ("app::blog::queries::ListPosts", "app::blog::handlers::ListPostsHandler"),
            ("app::Commands::blog::Publish", "app::Handlers::blog::PublishHandler"),
            ("app::blog::Archive", "app::blog::ArchiveHandler"),
            ("CreateX", "CreateXHandler"),
        ];
        for (input, expected) in cases {
            assert_eq!(conventional_handler_name(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn only_whole_segments_are_replaced() {
        assert_eq!(
            conventional_handler_name("app::subcommands::MyCommands"),
            "app::subcommands::MyCommandsHandler"
        );
        assert_eq!(
            conventional_handler_name("App.QueriesX.Get"),
            "App.QueriesX.GetHandler"
        );
    }
}
