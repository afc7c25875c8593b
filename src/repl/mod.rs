use crate::collector::{Collector, Phase};
use crate::scenario::{ObjectSpec, Scenario};
use colored::Colorize;
use rustyline::DefaultEditor;
use std::io;
use std::io::Write;
use std::string::String;

macro_rules! ok_or_printerr {
    ($action:expr) => {
        match $action {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        }
    };
}

pub fn serve_repl() {
    let mut stdout = io::stdout();
    let mut input_reader = DefaultEditor::new().unwrap();
    let mut collector =
        Collector::new(Scenario::demo()).expect("the demo scenario is well formed");

    loop {
        println!();
        print_state(&collector);
        stdout.flush().unwrap();
        let input = match input_reader.readline(">> ") {
            Ok(inp) => inp,
            Err(_) => break,
        };
        input_reader.add_history_entry(input.as_str()).unwrap();

        let words: Vec<&str> = input.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["exit"] => break,
            ["help"] => {
                println!(
                    r#"
    {} - flip the marked attribute on every object reachable from root
    {} - plan compacted addresses and retarget pointers (no payload moves)
    {} - drop garbage and move survivors to their planned addresses
    {} - step back to before the previous phase transition
    {} - restore the demo scenario and forget all history
    {} [addr] - repoint the root, or clear it (Idle only)
    {} <id> <addr> <size> [fields...] - place an object; "_" is an empty field (Idle only)
    {} - terminates the session
    {} - shows this message
"#,
                    "mark".underline(),
                    "prepare".underline(),
                    "crunch".underline(),
                    "undo".underline(),
                    "reset".underline(),
                    "root".underline(),
                    "alloc".underline(),
                    "exit".underline(),
                    "help".underline()
                );
            }
            ["mark"] => ok_or_printerr!(collector.mark()),
            ["prepare"] => ok_or_printerr!(collector.prepare()),
            ["crunch"] => ok_or_printerr!(collector.crunch()),
            ["undo"] => ok_or_printerr!(collector.undo()),
            ["reset"] => ok_or_printerr!(collector.reset(Scenario::demo())),
            ["root"] => ok_or_printerr!(collector.set_root(None)),
            ["root", addr] => {
                let addr = ok_or_printerr!(parse_number(addr));
                ok_or_printerr!(collector.set_root(Some(addr)))
            }
            ["alloc", id, addr, size, field_toks @ ..] => {
                let spec = ok_or_printerr!(parse_alloc(id, addr, size, field_toks));
                ok_or_printerr!(collector.insert_object(spec))
            }
            _ => eprintln!("{}", "unrecognized command; try \"help\"".red()),
        }
    }
}

fn parse_number(tok: &str) -> Result<usize, String> {
    tok.parse::<usize>()
        .map_err(|_| format!("expected a cell address, got \"{tok}\""))
}

fn parse_alloc(
    id: &str,
    addr: &str,
    size: &str,
    field_toks: &[&str],
) -> Result<ObjectSpec, String> {
    let address = parse_number(addr)?;
    let size = parse_number(size)?;
    let fields = if field_toks.is_empty() && size > 0 {
        vec![None; size - 1]
    } else {
        field_toks
            .iter()
            .map(|tok| match *tok {
                "_" => Ok(None),
                other => parse_number(other).map(Some),
            })
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(ObjectSpec {
        id: id.to_string(),
        address,
        size,
        fields,
    })
}

/// a cell grid plus one line per object; display only, everything shown
/// comes from the collector's query surface
fn print_state(collector: &Collector) {
    let heap = collector.heap();
    println!(
        "phase: {}   root: {}   next_free: {}",
        collector.phase().to_string().bold(),
        match heap.root() {
            Some(root) => root.to_string(),
            None => "(none)".to_string(),
        },
        heap.next_free()
    );

    println!("{}", render_grid(collector));
    for obj in heap.objects() {
        let line = obj.to_string();
        if obj.marked {
            println!("  {}", line.green());
        } else if collector.phase() == Phase::Marked || collector.phase() == Phase::Prepared {
            println!("  {}", line.dimmed());
        } else {
            println!("  {line}");
        }
    }

    if !collector.mapping().is_empty() {
        let mut entries: Vec<(usize, usize)> = collector
            .mapping()
            .iter()
            .map(|(&old, &new)| (old, new))
            .collect();
        entries.sort();
        let rendered: Vec<String> = entries
            .iter()
            .map(|(old, new)| format!("{old} -> {new}"))
            .collect();
        println!("  mapping: {}", rendered.join(", "));
    }
}

/// one character per cell: the object's first id character on its header
/// cell, lowercase on its remaining cells, '.' on free cells
fn render_grid(collector: &Collector) -> String {
    let heap = collector.heap();
    let mut grid: Vec<String> = vec![".".dimmed().to_string(); heap.memory_size()];
    for obj in heap.objects() {
        let tag = obj.id.chars().next().unwrap_or('?');
        for cell in obj.address..obj.end() {
            let ch = if cell == obj.address {
                tag.to_uppercase().to_string()
            } else {
                tag.to_lowercase().to_string()
            };
            grid[cell] = if obj.marked {
                ch.green().to_string()
            } else {
                ch
            };
        }
    }
    grid.concat()
}
