use std::fmt::{self, Display, Formatter};

use crate::naming::quote;

/// One RouterOS command line such as `add chain=input action=accept`.
///
/// Values are quoted on render when they contain anything beyond plain
/// identifier characters. A comment, when present, is rendered right after
/// the verb so the last option stays foldable by `ros_script::shorten`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    verb: String,
    comment: Option<String>,
    options: Vec<(&'static str, Option<String>)>,
}

impl CommandLine {
    pub fn add() -> Self {
        Self::verb("add")
    }

    /// `set <target>`, or a bare `set` for singleton menus like `/ip dns`.
    pub fn set(target: Option<&str>) -> Self {
        match target {
            Some(t) => Self::verb(format!("set {}", quote(t))),
            None => Self::verb("set"),
        }
    }

    fn verb(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            comment: None,
            options: Vec::new(),
        }
    }

    pub fn opt(mut self, key: &'static str, value: impl Display) -> Self {
        self.options.push((key, Some(value.to_string())));
        self
    }

    /// A bare keyword argument such as `fib`.
    pub fn flag(mut self, key: &'static str) -> Self {
        self.options.push((key, None));
        self
    }

    pub fn opt_some(self, key: &'static str, value: Option<impl Display>) -> Self {
        match value {
            Some(v) => self.opt(key, v),
            None => self,
        }
    }

    /// Attach `comment=` when `enabled`.
    pub fn comment(mut self, enabled: bool, text: impl Display) -> Self {
        if enabled {
            self.comment = Some(text.to_string());
        }
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for CommandLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verb)?;
        if let Some(comment) = &self.comment {
            write!(f, " comment={}", quote(comment))?;
        }
        for (key, value) in &self.options {
            match value {
                Some(value) => write!(f, " {key}={}", quote(value))?,
                None => write!(f, " {key}")?,
            }
        }
        Ok(())
    }
}

impl From<CommandLine> for String {
    fn from(value: CommandLine) -> Self {
        value.render()
    }
}

#[cfg(test)]
mod tests {
    use super::CommandLine;

    #[test]
    fn renders_comment_first_and_quotes_values() {
        let line = CommandLine::add()
            .opt("dst-address", "1.1.1.1/32")
            .opt("gateway", "ether1")
            .comment(true, "CheckIP ISP A")
            .render();
        assert_eq!(
            line,
            r#"add comment="CheckIP ISP A" dst-address=1.1.1.1/32 gateway=ether1"#
        );
    }

    #[test]
    fn flags_render_without_value() {
        let line = CommandLine::add().opt("name", "to-ISP-A").flag("fib").render();
        assert_eq!(line, "add name=to-ISP-A fib");
    }

    #[test]
    fn disabled_comment_is_dropped() {
        let line = CommandLine::set(Some("ssh"))
            .opt("disabled", "no")
            .comment(false, "ignored")
            .render();
        assert_eq!(line, "set ssh disabled=no");
    }
}
