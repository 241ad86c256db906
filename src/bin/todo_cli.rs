//! Command-line client for the todo API.
//!
//! Reads the server location from `TODO_API_URL` (default
//! `http://localhost:5000`).
//!
//! Usage:
//!   todolist-cli list [--filter all|active|completed] [--sort newest|oldest|priority]
//!   todolist-cli add <title> [description]
//!   todolist-cli done <id>
//!   todolist-cli rm <id>
//!   todolist-cli pdf [dir]

use std::path::Path;

use uuid::Uuid;

use todolist::client::{apply_filter, apply_sort, ClientError, Filter, SortBy, TodoClient};
use todolist::task::Task;

#[tokio::main]
async fn main() {
    let base_url =
        std::env::var("TODO_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let client = TodoClient::new(base_url);
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(err) = run(&client, &args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(client: &TodoClient, args: &[String]) -> Result<(), ClientError> {
    match args.first().map(String::as_str) {
        Some("list") => {
            let (filter, sort) = parse_list_flags(&args[1..])?;
            let mut tasks = apply_filter(&client.list().await?, filter);
            apply_sort(&mut tasks, sort);
            if tasks.is_empty() {
                println!("No todos found.");
            }
            for task in &tasks {
                print_task(task);
            }
            Ok(())
        }
        Some("add") => {
            let title = args
                .get(1)
                .ok_or_else(|| ClientError::Api("usage: add <title> [description]".to_string()))?;
            let task = client.create(title, args.get(2).map(String::as_str)).await?;
            println!("Created {}", task.id);
            Ok(())
        }
        Some("done") => {
            let task = client.get(parse_id(args.get(1))?).await?;
            let task = client.toggle_completed(&task).await?;
            println!(
                "{} is now {}",
                task.id,
                if task.completed { "completed" } else { "active" }
            );
            Ok(())
        }
        Some("rm") => {
            let task = client.delete(parse_id(args.get(1))?).await?;
            println!("Deleted {} ({})", task.title, task.id);
            Ok(())
        }
        Some("pdf") => {
            let dir = args.get(1).map(String::as_str).unwrap_or(".");
            let path = client.download_report(Path::new(dir)).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
        _ => Err(ClientError::Api(
            "usage: todolist-cli <list|add|done|rm|pdf> [args]".to_string(),
        )),
    }
}

fn parse_list_flags(args: &[String]) -> Result<(Filter, SortBy), ClientError> {
    let mut filter = Filter::default();
    let mut sort = SortBy::default();

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| ClientError::Api(format!("missing value for {flag}")))?;
        match flag.as_str() {
            "--filter" => filter = value.parse().map_err(ClientError::Api)?,
            "--sort" => sort = value.parse().map_err(ClientError::Api)?,
            other => return Err(ClientError::Api(format!("unknown flag: {other}"))),
        }
    }
    Ok((filter, sort))
}

fn parse_id(arg: Option<&String>) -> Result<Uuid, ClientError> {
    let raw = arg.ok_or_else(|| ClientError::Api("missing todo id".to_string()))?;
    Uuid::parse_str(raw).map_err(|_| ClientError::Api(format!("invalid todo id: {raw}")))
}

fn print_task(task: &Task) {
    println!(
        "[{}] {:8} {}  {}{}",
        if task.completed { "x" } else { " " },
        task.priority.as_str().to_uppercase(),
        task.id,
        task.title,
        task.description
            .as_deref()
            .map(|d| format!(" - {d}"))
            .unwrap_or_default()
    );
}
