//! End-to-end persistence: commands executed in one engine instance survive
//! a save, a process "restart" (a fresh engine), and further mutation.

use minirel::Engine;
use tempfile::TempDir;

fn run(engine: &mut Engine, command: &str) {
    engine.dispatch(command).expect(command);
}

#[test]
fn database_round_trips_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.db");

    // first session: build two tables and persist them
    {
        let mut engine = Engine::new();
        run(
            &mut engine,
            "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(50) NOT NULL, age INT)",
        );
        run(&mut engine, "CREATE TABLE products (id INT, price FLOAT)");
        run(&mut engine, "INSERT INTO users VALUES (1, alice, 30)");
        run(&mut engine, "INSERT INTO users VALUES (2, bob, 45)");
        run(&mut engine, "INSERT INTO products VALUES (1, 9.99)");
        engine.save_to_store(&path);
    }

    // second session: everything is back, constraints included
    {
        let mut engine = Engine::new();
        engine.load_from_store(&path);

        let users = engine.table("users").expect("users table");
        assert_eq!(users.row_count(), 2);
        assert_eq!(users.rows()[0].value(1), "alice");
        assert_eq!(users.primary_key_index(), Some(0));
        assert!(users.columns()[1].not_null);

        // the reloaded primary key still rejects duplicates
        assert!(engine.dispatch("INSERT INTO users VALUES (2, carol, 28)").is_err());
        run(&mut engine, "INSERT INTO users VALUES (3, carol, 28)");
        run(&mut engine, "DELETE FROM users WHERE age < 40 AND name = alice");
        engine.save_to_store(&path);
    }

    // third session: the second session's mutations stuck
    {
        let mut engine = Engine::new();
        engine.load_from_store(&path);

        let names: Vec<&str> = engine
            .table("users")
            .expect("users table")
            .rows()
            .iter()
            .map(|r| r.value(1))
            .collect();
        assert_eq!(names, vec!["bob", "carol"]);
        assert_eq!(engine.table("products").expect("products table").row_count(), 1);
    }
}

#[test]
fn loading_a_missing_store_starts_empty() {
    let dir = TempDir::new().unwrap();
    let mut engine = Engine::new();
    engine.load_from_store(&dir.path().join("absent.db"));
    assert!(engine.tables().is_empty());
}
