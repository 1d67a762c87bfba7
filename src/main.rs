use std::env;
use std::fs;
use std::process;

const USAGE: &str = "Usage: chordsheet [--transpose N] [--json] [--tab] <input> [output]";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut steps = 0;
    let mut json = false;
    let mut from_tab = false;
    let mut paths: Vec<&String> = Vec::new();

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--tab" => from_tab = true,
            "--transpose" => {
                steps = match iter.next().map(|value| value.parse::<i32>()) {
                    Some(Ok(value)) => chordsheet::clamp_steps(value),
                    _ => {
                        eprintln!("--transpose needs a whole number of semitones");
                        eprintln!("{}", USAGE);
                        process::exit(1);
                    }
                };
            }
            _ => paths.push(arg),
        }
    }

    let (input_path, output_path) = match paths.as_slice() {
        [input] => (*input, None),
        [input, output] => (*input, Some(*output)),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    // Parse
    let song = if from_tab {
        chordsheet::import::TabRecord::from_json(&source).and_then(|tab| chordsheet::import::song_from_tab(&tab))
    } else {
        chordsheet::parse_song_document(&source)
    };

    let result = song.and_then(|song| {
        if json {
            serde_json::to_string_pretty(&chordsheet::render_song(&song, steps))
                .map_err(|e| chordsheet::ChartError::RecordError(e.to_string()))
        } else {
            chordsheet::to_song_document(&chordsheet::transpose_song(&song, steps))
        }
    });

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote {} to {}", if json { "rendered song" } else { "song document" }, path);
        }
        None => {
            println!("{}", output);
        }
    }
}
