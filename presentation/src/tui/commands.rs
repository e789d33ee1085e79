//! `:` commands typed into the input line

use super::theme::ThemeName;
use confab_domain::{ChatMessage, ConfirmationRequest, ContentType};
use std::fmt;
use std::str::FromStr;

pub const HELP_TEXT: &str = "\
# Keys

Enter      send the input line
Esc        cancel the running reply / decline the prompt
1 y Y      confirm the active prompt
2 n N      decline the active prompt
Tab        focus the next panel
Up Down    recall earlier input (scroll one line outside the input)
PgUp PgDn  scroll a page (also Ctrl+U / Ctrl+D)
Home End   scroll to top / bottom outside the input
Ctrl+Z     zoom the side viewer
F12        toggle the debug panel
F1         toggle this help
Ctrl+C     quit

# Commands

:help                 show this help
:theme <name>         default, light or high-contrast
:demo diff            preview a diff confirmation
:demo markdown        preview a markdown confirmation
:demo tool            a tool approval prompt
:zoom                 toggle zoom of the side viewer
:debug                toggle the debug panel
:clear                clear the conversation
:yank [n]             copy the last n messages (also :y, :y3)
:cancel               cancel the running reply
:quit                 exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Diff,
    Markdown,
    Tool,
}

impl DemoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoKind::Diff => "diff",
            DemoKind::Markdown => "markdown",
            DemoKind::Tool => "tool",
        }
    }
}

impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diff" => Ok(DemoKind::Diff),
            "markdown" | "md" => Ok(DemoKind::Markdown),
            "tool" => Ok(DemoKind::Tool),
            _ => Err(format!(
                "Unknown demo: '{}'. Valid: diff, markdown, tool",
                s
            )),
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Help,
    Theme(ThemeName),
    Demo(DemoKind),
    Zoom,
    Debug,
    Clear,
    /// Copy the last `n` messages to the clipboard
    Yank(usize),
    Cancel,
    Quit,
}

/// Parse a `:` command. Returns `None` when `input` is not a command.
pub fn parse_command(input: &str) -> Option<Result<UiCommand, String>> {
    let rest = input.trim().strip_prefix(':')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let command = match name {
        "help" | "h" | "?" => Ok(UiCommand::Help),
        "theme" => match arg {
            Some(arg) => arg.parse().map(UiCommand::Theme),
            None => Err("Usage: :theme <default|light|high-contrast>".to_string()),
        },
        "demo" => match arg {
            Some(arg) => arg.parse().map(UiCommand::Demo),
            None => Err("Usage: :demo <diff|markdown|tool>".to_string()),
        },
        "zoom" => Ok(UiCommand::Zoom),
        "debug" => Ok(UiCommand::Debug),
        "clear" => Ok(UiCommand::Clear),
        "yank" | "y" => parse_count(arg.unwrap_or("1")).map(UiCommand::Yank),
        // Vim-style count glued to the name: `:y3`
        short if short.starts_with('y') && short[1..].bytes().all(|b| b.is_ascii_digit()) => {
            parse_count(&short[1..]).map(UiCommand::Yank)
        }
        "cancel" => Ok(UiCommand::Cancel),
        "q" | "quit" | "exit" => Ok(UiCommand::Quit),
        "" => Err("Empty command. Type :help for the list".to_string()),
        other => Err(format!(
            "Unknown command: ':{}'. Type :help for the list",
            other
        )),
    };
    Some(command)
}

fn parse_count(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!(
            "Invalid count '{}'. Usage: :yank [n] with n >= 1",
            arg
        )),
    }
}

/// Clipboard text for `messages`, oldest first.
pub fn yank_text(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}", m.role.label().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

const DEMO_DIFF: &str = "\
--- a/src/greeting.rs
+++ b/src/greeting.rs
@@ -1,5 +1,7 @@
 pub fn greet(name: &str) -> String {
-    format!(\"Hello {}\", name)
+    let name = name.trim();
+    if name.is_empty() {
+        return \"Hello there\".to_string();
+    }
+    format!(\"Hello, {}!\", name)
 }
";

const DEMO_MARKDOWN: &str = "\
# Release notes

## Added

- Side viewer for diffs and markdown
- Queued confirmations with position notices

## Changed

> Esc now cancels the running reply.

```
confab --theme light
```
";

/// A sample confirmation request, numbered so repeated demos stay unique.
pub fn demo_request(kind: DemoKind, sequence: u64) -> ConfirmationRequest {
    let id = format!("demo-{}-{}", kind, sequence);
    match kind {
        DemoKind::Diff => ConfirmationRequest::user(id, "Apply change")
            .with_message("Apply this patch to src/greeting.rs?")
            .with_content(ContentType::Diff, DEMO_DIFF)
            .with_file_path("src/greeting.rs")
            .with_buttons("Continue", "Close"),
        DemoKind::Markdown => ConfirmationRequest::user(id, "Review notes")
            .with_message("Publish these release notes?")
            .with_content(ContentType::Markdown, DEMO_MARKDOWN)
            .with_file_path("CHANGELOG.md")
            .with_buttons("Continue", "Close"),
        DemoKind::Tool => ConfirmationRequest::tool(id, "run_command")
            .with_message("cargo fmt --all"),
    }
}
