use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The result as is; lists in their debug representation
    Raw,
    /// List items delimited by a single space
    #[value(name = "list_space")]
    ListSpace,
    /// List items delimited by a comma
    #[value(name = "list_comma")]
    ListComma,
}

/// What a single tool invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Nothing,
    Text(String),
    List(Vec<String>),
}

/// Formats `result`; `None` means nothing is printed, not even a newline.
pub fn render(result: &QueryResult, format: OutputFormat) -> Option<String> {
    match result {
        QueryResult::Nothing => None,
        QueryResult::Text(text) if text.is_empty() => None,
        QueryResult::Text(text) => Some(text.clone()),
        QueryResult::List(items) if items.is_empty() => None,
        QueryResult::List(items) => Some(match format {
            OutputFormat::Raw => format!("{:?}", items),
            OutputFormat::ListSpace => items.join(" "),
            OutputFormat::ListComma => items.join(","),
        }),
    }
}

/// Prints the rendered result to stdout.
pub fn print(result: &QueryResult, format: OutputFormat) {
    if let Some(rendered) = render(result, format) {
        println!("{}", rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> QueryResult {
        QueryResult::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_results_print_nothing() {
        for format in [OutputFormat::Raw, OutputFormat::ListSpace, OutputFormat::ListComma] {
            assert_eq!(render(&QueryResult::Nothing, format), None);
            assert_eq!(render(&list(&[]), format), None);
            assert_eq!(render(&QueryResult::Text(String::new()), format), None);
        }
    }

    #[test]
    fn lists_are_joined() {
        let result = list(&["R1", "R2"]);
        assert_eq!(render(&result, OutputFormat::ListComma).as_deref(), Some("R1,R2"));
        assert_eq!(render(&result, OutputFormat::ListSpace).as_deref(), Some("R1 R2"));
        assert_eq!(
            render(&result, OutputFormat::Raw).as_deref(),
            Some(r#"["R1", "R2"]"#)
        );
    }

    #[test]
    fn text_is_never_split() {
        let log = QueryResult::Text("started\nrecovered".to_string());
        for format in [OutputFormat::Raw, OutputFormat::ListSpace, OutputFormat::ListComma] {
            assert_eq!(render(&log, format).as_deref(), Some("started\nrecovered"));
        }
    }

    #[test]
    fn format_names_match_command_line() {
        assert_eq!(
            OutputFormat::from_str("list_space", false).unwrap(),
            OutputFormat::ListSpace
        );
        assert_eq!(
            OutputFormat::from_str("list_comma", false).unwrap(),
            OutputFormat::ListComma
        );
        assert!(OutputFormat::from_str("list-space", false).is_err());
    }
}
