use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::core::engine::Engine;
use crate::core::error::DbError;

/// Interactive shell around the engine. It owns session bookkeeping only:
/// the current database name, its on-disk folder, and save points. Every
/// statement string goes through [`Engine::dispatch`] untouched.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding one sub-directory per database.
    #[arg(short, long, default_value = "databases")]
    data_dir: PathBuf,

    /// Database selected at startup.
    #[arg(short = 'b', long, default_value = "master")]
    database: String,
}

impl Cli {
    pub fn run(&self) -> Result<(), DbError> {
        let mut engine = Engine::new();
        let mut current = self.database.clone();
        std::fs::create_dir_all(self.database_folder(&current))?;
        engine.load_from_store(&self.database_file(&current));

        print_help();

        let stdin = io::stdin();
        'session: loop {
            print!("dbms[{}]> ", current);
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                // EOF behaves like EXIT
                engine.save_to_store(&self.database_file(&current));
                break;
            }

            // one input line may carry several ';'-separated commands
            for command in line.split(';').map(str::trim).filter(|c| !c.is_empty()) {
                let upper = command.to_ascii_uppercase();

                if upper == "EXIT" || upper == "QUIT" {
                    engine.save_to_store(&self.database_file(&current));
                    println!("Goodbye!");
                    break 'session;
                } else if upper == "HELP" {
                    print_help();
                } else if let Some(name) = strip_keyword(command, "CREATE DATABASE") {
                    self.create_database(name.trim());
                } else if let Some(name) = strip_keyword(command, "USE ") {
                    let name = name.trim();
                    if name.is_empty() {
                        println!("Error: Database name is required.");
                    } else if !self.database_folder(name).is_dir() {
                        println!("Error: Database '{}' does not exist.", name);
                    } else {
                        // save the current database before switching
                        engine.save_to_store(&self.database_file(&current));
                        current = name.to_string();
                        engine.load_from_store(&self.database_file(&current));
                        println!("Switched to database '{}'.", current);
                    }
                } else {
                    match engine.dispatch(command) {
                        Ok(result) => {
                            println!("{}", result);
                            if result.is_mutation() {
                                engine.save_to_store(&self.database_file(&current));
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                println!();
            }
        }
        Ok(())
    }

    fn database_folder(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    fn database_file(&self, name: &str) -> PathBuf {
        self.database_folder(name).join("database.db")
    }

    fn create_database(&self, name: &str) {
        if name.is_empty() {
            println!("Error: Database name is required.");
        } else if self.database_folder(name).is_dir() {
            println!("Error: Database '{}' already exists.", name);
        } else if let Err(e) = std::fs::create_dir_all(self.database_folder(name)) {
            println!("Error: could not create database folder: {}", e);
        } else {
            println!("Database '{}' created.", name);
        }
    }
}

/// The remainder of `command` after a leading case-insensitive keyword, or
/// `None` when the keyword is not there.
fn strip_keyword<'a>(command: &'a str, keyword: &str) -> Option<&'a str> {
    let head = command.get(..keyword.len())?;
    if head.eq_ignore_ascii_case(keyword) {
        Some(&command[keyword.len()..])
    } else {
        None
    }
}

fn print_help() {
    println!("Supported commands:");
    println!("  CREATE DATABASE db_name");
    println!("  USE db_name");
    println!("  CREATE TABLE table_name (col1 type1 [PRIMARY KEY] [NOT NULL], ...)");
    println!("  INSERT INTO table_name VALUES (val1, val2, ...)");
    println!("  SELECT * FROM table_name [WHERE condition [AND condition]...]");
    println!("  SELECT col1, col2 FROM table_name [WHERE condition]");
    println!("  UPDATE table_name SET col1=val1, col2=val2 [WHERE condition]");
    println!("  DELETE FROM table_name [WHERE condition]");
    println!("  DROP TABLE table_name");
    println!("  LIST TABLES");
    println!("  HELP");
    println!("  EXIT");
    println!();
    println!("Supported types: INT, FLOAT, VARCHAR(size)");
    println!("Supported operators in WHERE: =, !=, <, >, <=, >=");
}
