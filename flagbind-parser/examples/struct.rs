use flagbind_parser::{Error, Parser};

#[derive(Default)]
struct MyArgs {
    field1: u32,
    field2: u32,
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let argv = &["--field1", "42", "-v", "input.txt"];

    let mut args = MyArgs {
        field2: 7,
        ..Default::default()
    };

    let rest = {
        let mut parser = Parser::new();
        parser.flag("--field1", "First field.", &mut args.field1)?;
        parser.flag("--field2", "Second field.", &mut args.field2)?;
        parser.flag("-v", "Verbose output.", &mut args.verbose)?;
        parser.parse(argv)?
    };

    if 42 != args.field1 {
        panic!("invalid field1");
    }

    // Absent flags keep their default.
    if 7 != args.field2 || !args.verbose {
        panic!("invalid field2 or verbose");
    }

    if rest != ["input.txt"] {
        panic!("invalid remaining arguments");
    }

    Ok(())
}
