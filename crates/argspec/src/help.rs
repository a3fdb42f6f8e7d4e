//! Help and usage rendering.

use crate::schema::{OptionSpec, PositionalSpec, Schema};

const INDENT: &str = "  ";
const DETAIL_INDENT: &str = "      ";

const HELP_FORMS: &str = "-h, --help";
const HELP_DESCRIPTION: &str = "print this help and exit";

fn push_description(out: &mut String, description: &str) {
    for line in description.lines() {
        out.push_str(DETAIL_INDENT);
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn push_detail(out: &mut String, detail: &str) {
    out.push_str(DETAIL_INDENT);
    out.push_str(detail);
    out.push('\n');
}

fn option_left(opt: &OptionSpec) -> String {
    let forms: Vec<String> = [opt.short_form(), opt.long_form()]
        .into_iter()
        .flatten()
        .collect();
    let mut out = forms.join(", ");
    match opt.get_arity() {
        0 => {}
        1 => {
            out.push(' ');
            out.push_str(opt.get_metavar());
        }
        _ => {
            out.push(' ');
            out.push_str(opt.get_metavar());
            out.push_str("...");
        }
    }
    out
}

fn positional_left(pos: &PositionalSpec) -> String {
    if pos.is_capturing() {
        format!("{}...", pos.get_metavar())
    } else {
        pos.get_metavar().to_string()
    }
}

impl Schema {
    /// `<name> <major>.<minor>.<patch>`
    pub fn version_line(&self) -> String {
        format!("{} {}", self.app().name(), self.app().version())
    }

    /// `usage: <name> [OPTION] <POSITIONAL>...`
    pub fn usage(&self) -> String {
        let mut out = format!("usage: {} [OPTION]", self.app().name());
        for pos in self.positionals() {
            out.push(' ');
            out.push_str(&positional_left(pos));
        }
        out
    }

    fn option_details(&self, opt: &OptionSpec, out: &mut String) {
        push_description(out, opt.get_description());
        if let Some(default) = opt.get_default() {
            push_detail(out, &format!("default: {}", default.join(" ")));
        }
        if let Some(possible) = opt.get_possible_values() {
            push_detail(out, &format!("possible values: {}", possible.join(", ")));
        }
        if opt.is_required() {
            push_detail(out, "required");
        }
        if !opt.get_conflicts_with().is_empty() {
            let names: Vec<String> = opt
                .get_conflicts_with()
                .iter()
                .map(|n| self.option(n).map(OptionSpec::display_name).unwrap_or_else(|| n.clone()))
                .collect();
            push_detail(out, &format!("conflicts with: {}", names.join(", ")));
        }
    }

    /// Full help text. Positionals and options are listed in declaration
    /// order; the implicit help option always comes last.
    pub fn help(&self) -> String {
        let mut out = self.version_line();
        out.push('\n');
        for line in self.app().description().lines() {
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.usage());
        out.push('\n');

        if !self.positionals().is_empty() {
            out.push_str("\npositionals:\n");
            for pos in self.positionals() {
                out.push_str(INDENT);
                out.push_str(&positional_left(pos));
                out.push('\n');
                push_description(&mut out, pos.get_description());
            }
        }

        out.push_str("\noptions:\n");
        for opt in self.options() {
            out.push_str(INDENT);
            out.push_str(&option_left(opt));
            out.push('\n');
            self.option_details(opt, &mut out);
        }
        out.push_str(INDENT);
        out.push_str(HELP_FORMS);
        out.push('\n');
        push_detail(&mut out, HELP_DESCRIPTION);

        out
    }
}
