use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process;

use machine::Machine;

mod keymap;
mod run;

const USAGE: &str = "Command usage:\n vip8 <program>\n vip8 --decode <program>";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (decode, rom_path) = match args.get(1).map(String::as_str) {
        Some("--decode") => match args.get(2) {
            Some(path) => (true, path.clone()),
            None => exit_usage(),
        },
        Some(path) => (false, path.to_string()),
        None => exit_usage(),
    };

    let mut machine = Machine::new();
    if let Err(e) = load(&mut machine, &rom_path) {
        eprintln!("error: {}", e);
        process::exit(1);
    }

    if decode {
        println!("{}", machine.disassemble());
    } else {
        run::run(machine, &rom_name(&rom_path));
    }
}

fn load(machine: &mut Machine, path: &str) -> Result<usize, machine::MachineError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    machine.load_rom(&mut reader)
}

/// The file stem, for the window title.
fn rom_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn exit_usage() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}
