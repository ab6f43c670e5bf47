use std::io::Write;

use dbulk_model::Context;

use crate::pool::JobKind;

/// `[finished/total] <action> <name>` progress line, keyed off `Context`'s
/// own counters instead of a counter the printer keeps itself.
#[derive(Debug)]
pub struct Printer {
    console: console::Term,
}

impl Default for Printer {
    fn default() -> Self {
        Printer {
            console: console::Term::stdout(),
        }
    }
}

impl Printer {
    pub fn finished(&mut self, kind: JobKind, ctx: &Context, success: bool) {
        let name = ctx.name(ctx.build(kind.build_id()).name).name.clone();
        let line = format!(
            "[{}/{}] {} {}",
            ctx.numfinished,
            ctx.numtotal,
            kind.action(),
            name
        );
        if self.console.is_term() {
            let _ = self.console.clear_line();
        }
        writeln!(self.console, "{}", line).expect("write");

        if !success {
            writeln!(self.console, "FAILED: {} {}", kind.action(), name).expect("write");
        }
    }
}

impl Drop for Printer {
    fn drop(&mut self) {
        if self.console.is_term() {
            let _ = self.console.write_line("");
        }
    }
}
