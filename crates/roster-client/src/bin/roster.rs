// Terminal front end for the roster API.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use roster_client::{ClientConfig, HttpPeopleApi, PersonForm, SyncClient, View};
use roster_common::Person;
use std::io::{BufRead, Write};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Browse and edit person records on a roster API")]
struct Cli {
    /// API base URL (overrides ROSTER_API_BASE and the config file)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// YAML config file (overrides ROSTER_CLIENT_CONFIG)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all records, newest first
    List,
    /// List records whose name contains QUERY (case-insensitive)
    Search { query: String },
    /// Show one record
    Show { id: i64 },
    /// Create a record
    Add(FieldArgs),
    /// Replace a record; fields not given keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl FieldArgs {
    fn apply(self, form: &mut PersonForm) {
        if let Some(value) = self.name {
            form.name = value;
        }
        if let Some(value) = self.email {
            form.email = value;
        }
        if let Some(value) = self.age {
            form.age = value;
        }
        if let Some(value) = self.notes {
            form.notes = value;
        }
    }
}

struct TerminalView {
    assume_yes: bool,
    show_list: bool,
}

impl View for TerminalView {
    fn render(&mut self, people: &[Person]) {
        if self.show_list {
            print_people(people.iter());
        }
    }

    fn show_form(&mut self, editing: Option<i64>, form: &PersonForm) {
        match editing {
            Some(id) => println!("id:    {id}"),
            None => println!("(new record)"),
        }
        println!("name:  {}", form.name);
        println!("email: {}", form.email);
        println!("age:   {}", form.age);
        println!("notes: {}", form.notes);
    }

    fn notify_error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

fn print_people<'a>(people: impl Iterator<Item = &'a Person>) {
    let mut count = 0;
    for person in people {
        count += 1;
        println!(
            "{:>6}  {:<24}  {:<28}  {:>4}  {}",
            person.id,
            person.name,
            person.email.as_deref().unwrap_or("-"),
            person.age.map(|age| age.to_string()).unwrap_or_else(|| "-".into()),
            person.notes.as_deref().unwrap_or("")
        );
    }
    if count == 0 {
        println!("(no people)");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env_or_yaml(cli.api_base.as_deref(), cli.config.as_deref())
        .context("roster client config")?;
    tracing::debug!(base = config.base_url(), "using roster api");

    let view = TerminalView {
        assume_yes: matches!(cli.command, Command::Delete { yes: true, .. }),
        show_list: !matches!(cli.command, Command::Search { .. }),
    };
    let mut client = SyncClient::new(HttpPeopleApi::new(config), view);

    // Failures are reported through the view; only the exit code is left.
    let outcome = match cli.command {
        Command::List => client.reload().await,
        Command::Search { query } => client.reload().await.map(|()| {
            print_people(client.filter(&query).into_iter());
        }),
        Command::Show { id } => client.begin_edit(id).await,
        Command::Add(fields) => {
            let mut form = PersonForm::default();
            fields.apply(&mut form);
            client.submit(form).await.map(|_| ())
        }
        Command::Edit { id, fields } => match client.begin_edit(id).await {
            Ok(()) => {
                let mut form = client.form().clone();
                fields.apply(&mut form);
                client.submit(form).await.map(|_| ())
            }
            Err(err) => Err(err),
        },
        Command::Delete { id, .. } => client.delete_record(id).await.map(|deleted| {
            match deleted {
                Some(0) => println!("person {id} was already gone"),
                Some(_) => println!("deleted person {id}"),
                None => println!("cancelled"),
            }
        }),
    };
    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}
