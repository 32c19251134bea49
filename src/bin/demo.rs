//! Scripted walkthrough of the command surface against an in-memory engine.

use minirel::Engine;

fn main() {
    let mut engine = Engine::new();

    let commands = [
        "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(50) NOT NULL, age INT)",
        "INSERT INTO users VALUES (1, alice, 30)",
        "INSERT INTO users VALUES (2, bob, 45)",
        // duplicate primary key, rejected
        "INSERT INTO users VALUES (1, eve, 22)",
        "SELECT * FROM users WHERE age >= 30",
        "UPDATE users SET age=31 WHERE name = alice",
        "SELECT name, age FROM users",
        "DELETE FROM users WHERE age < 40",
        "LIST TABLES",
        "DROP TABLE users",
    ];

    for command in commands {
        println!("> {}", command);
        match engine.dispatch(command) {
            Ok(result) => println!("{}\n", result),
            Err(e) => println!("Error: {}\n", e),
        }
    }
}
