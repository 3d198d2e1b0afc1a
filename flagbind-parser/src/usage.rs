//! Usage text of the registered flags.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::registry::Registry;

const MARGIN: usize = 4;
const GAP: usize = 2;

/// Write the usage text of `registry` into `w`.
///
/// One line per flag, in registration order, with names right-aligned and help texts starting
/// on the same column. Lines of a multi-line help are aligned on that column too.
pub fn write_usage<W>(
    w: &mut W,
    program: Option<&str>,
    registry: &Registry<'_, '_>,
) -> fmt::Result
where
    W: Write,
{
    match program {
        Some(program) if !program.is_empty() => writeln!(w, "Usage of {program}:")?,
        _ => writeln!(w, "Usage:")?,
    }

    let width = registry
        .iter()
        .map(|x| x.name().as_str().chars().count())
        .max()
        .unwrap_or(0);

    for entry in registry.iter() {
        write!(
            w,
            "{:margin$}{:>width$}{:gap$}",
            "",
            entry.name(),
            "",
            margin = MARGIN,
            gap = GAP,
        )?;

        let mut lines = entry.help().split('\n');
        if let Some(first) = lines.next() {
            w.write_str(first)?;
        }

        for line in lines {
            write!(w, "\n{:indent$}{line}", "", indent = MARGIN + width + GAP)?;
        }

        w.write_char('\n')?;
    }

    Ok(())
}

/// Render the usage text of `registry`.
pub fn render(program: Option<&str>, registry: &Registry<'_, '_>) -> String {
    let mut out = String::new();

    // Writing into a string cannot fail.
    let _ = write_usage(&mut out, program, registry);
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use googletest::prelude::*;

    use crate::parser::Parser;

    use super::*;

    #[test]
    fn it_should_render_header_only_without_flags() {
        let parser = Parser::new();

        assert_that!(parser.usage(Some("prog")), eq("Usage of prog:\n"));
        assert_that!(parser.usage(None), eq("Usage:\n"));
        assert_that!(parser.usage(Some("")), eq("Usage:\n"));
    }

    #[test]
    fn it_should_align_names_and_help() {
        let mut verbose = false;
        let mut count = 0u32;
        let mut tags: Vec<String> = Vec::new();

        let mut parser = Parser::new();
        parser.flag("-v", "Verbose output.", &mut verbose).unwrap();
        parser.flag("--count", "Number of runs.", &mut count).unwrap();
        parser.flag("--tag", "", &mut tags).unwrap();

        let expected = [
            "Usage of demo:\n",
            "         -v  Verbose output.\n",
            "    --count  Number of runs.\n",
            "      --tag  \n",
        ]
        .concat();

        assert_that!(render(Some("demo"), parser.registry()), eq(&expected));
    }

    #[test]
    fn it_should_indent_multi_line_help() {
        let mut depth = 0u8;

        let mut parser = Parser::new();
        parser
            .flag("--depth", "Maximum depth.\nZero means no limit.", &mut depth)
            .unwrap();

        let mut out = String::new();
        assert_that!(write_usage(&mut out, None, parser.registry()), eq(Ok(())));

        let lines: Vec<&str> = out.lines().collect();
        assert_that!(
            lines,
            eq(&alloc::vec![
                "Usage:",
                "    --depth  Maximum depth.",
                "             Zero means no limit.",
            ])
        );
    }
}
