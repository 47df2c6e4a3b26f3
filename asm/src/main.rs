use std::path::Path;

use color_print::{ceprintln, cprintln};
use p18asm::{hex_dump, listing, print_dump, Assembler, Config, Error, LineError};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.asm")]
    input: String,

    /// Code memory size in words
    #[clap(short, long, default_value_t = Config::DEFAULT_SIZE)]
    code_size: usize,

    /// Constant memory size in words
    #[clap(short = 'k', long, default_value_t = Config::DEFAULT_SIZE)]
    const_size: usize,

    /// Code memory hex file
    #[clap(short = 'o', long, default_value = "code.hex")]
    code_hex: String,

    /// Constant memory hex file
    #[clap(short = 'x', long, default_value = "const.hex")]
    const_hex: String,

    /// Listing file [default: INPUT with extension .lst]
    #[clap(short, long)]
    listing: Option<String>,

    /// Dump symbols and generated code
    #[clap(short, long)]
    debug: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            code_size: self.code_size,
            const_size: self.const_size,
            debug: self.debug,
        }
    }

    fn listing_path(&self) -> String {
        match &self.listing {
            Some(path) => path.clone(),
            None => Path::new(&self.input)
                .with_extension("lst")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("P18 Assembler");

    let mut asm = Assembler::new(args.config());
    if let Err(err) = run(&args, &mut asm) {
        err.print_diag(asm.lines());
        std::process::exit(1);
    }
    ceprintln!("<g,s>Success</>");
}

fn run(args: &Args, asm: &mut Assembler) -> Result<(), LineError> {
    println!("1. Read Files and Parse Lines");
    asm.read_file(&args.input)?;
    for file in asm.files() {
        println!("  < {}", file);
    }
    println!("  - {} lines, {} symbols", asm.lines().len(), asm.symbols().len());

    println!("2. Resolve Labels");
    asm.resolve()?;

    println!("3. Layout Memory");
    let image = asm.layout()?;
    cprintln!(
        "  - code <b>{}</>/{} words, const <b>{}</>/{} words",
        image.code_end,
        asm.config().code_size,
        image.const_end,
        asm.config().const_size
    );

    if asm.config().debug {
        print_dump(asm);
    }

    println!("4. Write Output");
    let listing_path = args.listing_path();
    write(&listing_path, &listing(asm.lines(), asm.records()))?;
    write(&args.code_hex, &hex_dump(&image.code))?;
    write(&args.const_hex, &hex_dump(&image.consts))?;
    Ok(())
}

fn write(path: &str, text: &str) -> Result<(), LineError> {
    println!("  > {}", path);
    std::fs::write(path, text).map_err(|e| Error::FileWrite(path.to_string(), e).at(0))
}
