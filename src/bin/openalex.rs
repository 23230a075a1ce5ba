//! CLI binary for the OpenAlex client.
//!
//! Usage: openalex list works --filter publication_year=2020 --sort cited_by_count=desc

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use openalex_client::error::{OpenAlexError, Result};
    use openalex_client::{Entity, GroupQuery, GroupsPage, ListPage, ListQuery, OpenAlexClient};
    use serde_json::Value;

    #[derive(Parser)]
    #[command(name = "openalex", about = "OpenAlex API client", version)]
    struct Cli {
        /// Contact email for the polite pool (overrides OPENALEX_EMAIL)
        #[arg(long, global = true)]
        email: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Fetch a random entity
        Random {
            /// works, authors, institutions, venues or concepts
            entity: Entity,
        },
        /// Fetch one entity by ID
        Get {
            entity: Entity,
            /// OpenAlex ID, URL, or namespaced value (with --id-type)
            id: String,
            /// ID namespace (doi, orcid, ror, issn, mag, ...)
            #[arg(short = 't', long)]
            id_type: Option<String>,
        },
        /// List entities
        List {
            entity: Entity,
            /// Filter as key=value (repeatable)
            #[arg(short, long, value_parser = parse_pair)]
            filter: Vec<(String, String)>,
            /// Full-text search
            #[arg(short, long)]
            search: Option<String>,
            /// Sort as key=asc|desc (repeatable)
            #[arg(long, value_parser = parse_pair)]
            sort: Vec<(String, String)>,
            /// Results per page (1-200)
            #[arg(long)]
            per_page: Option<i32>,
            /// Page numbers to fetch; cursor paging when omitted (repeatable)
            #[arg(short, long)]
            page: Vec<i64>,
            /// Stop after this many pages
            #[arg(long, default_value = "1")]
            max_pages: usize,
        },
        /// Group entities by an attribute
        Groups {
            entity: Entity,
            group_by: String,
            #[arg(short, long, value_parser = parse_pair)]
            filter: Vec<(String, String)>,
            #[arg(short, long)]
            search: Option<String>,
            /// Sort as count|key=asc|desc (repeatable)
            #[arg(long, value_parser = parse_pair)]
            sort: Vec<(String, String)>,
        },
    }

    fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
        s.split_once('=')
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .ok_or_else(|| format!("expected key=value, got '{}'", s))
    }

    fn make_client(email: Option<String>) -> Result<OpenAlexClient> {
        let client = OpenAlexClient::from_env()?;
        Ok(match email {
            Some(e) => client.email(e),
            None => client,
        })
    }

    fn text(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn print_results_table(results: &[Value]) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "Cited by"]);

        for result in results {
            let id = text(&result["id"]);
            let id = id.trim_start_matches("https://openalex.org/");
            let name = text(&result["display_name"]);
            let name = if name.chars().count() > 60 {
                format!("{}...", name.chars().take(57).collect::<String>())
            } else {
                name
            };
            table.add_row(vec![id.to_string(), name, text(&result["cited_by_count"])]);
        }

        println!("{table}");
    }

    fn print_groups_table(groups: &GroupsPage) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Key", "Name", "Count"]);
        for bucket in &groups.group_by {
            table.add_row(vec![
                bucket.key.clone(),
                bucket.key_display_name.clone().unwrap_or_default(),
                bucket.count.to_string(),
            ]);
        }
        println!("{table}");
    }

    fn print_value(value: &Value) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        let client = make_client(cli.email)?;

        match cli.command {
            Commands::Random { entity } => {
                let value = client.endpoint(entity).random().await?;
                print_value(&value)?;
            }

            Commands::Get {
                entity,
                id,
                id_type,
            } => {
                let value = client
                    .endpoint(entity)
                    .single(&id, id_type.as_deref())
                    .await?;
                print_value(&value)?;
            }

            Commands::List {
                entity,
                filter,
                search,
                sort,
                per_page,
                page,
                max_pages,
            } => {
                let mut query = ListQuery::new().pages(page);
                for (k, v) in filter {
                    query = query.filter(k, v);
                }
                for (k, v) in sort {
                    query = query.sort(k, v);
                }
                if let Some(s) = search {
                    query = query.search(s);
                }
                if let Some(n) = per_page {
                    query = query.per_page(n);
                }

                let mut pages = client.endpoint(entity).list(&query)?;
                let mut fetched = 0;
                while fetched < max_pages {
                    let Some(page) = pages.next().await else {
                        break;
                    };
                    let page = page?;
                    fetched += 1;
                    match cli.output {
                        OutputFormat::Json => print_value(&page)?,
                        OutputFormat::Table => {
                            let page = ListPage::from_value(page)?;
                            if let Some(count) = page.meta.count {
                                println!("{} {} found (page {}):", count, entity, fetched);
                            }
                            print_results_table(&page.results);
                        }
                    }
                }
            }

            Commands::Groups {
                entity,
                group_by,
                filter,
                search,
                sort,
            } => {
                let mut query = GroupQuery::new(group_by);
                for (k, v) in filter {
                    query = query.filter(k, v);
                }
                for (k, v) in sort {
                    query = query.sort(k, v);
                }
                if let Some(s) = search {
                    query = query.search(s);
                }

                let value = client.endpoint(entity).groups(&query).await?;
                match cli.output {
                    OutputFormat::Json => print_value(&value)?,
                    OutputFormat::Table => print_groups_table(&GroupsPage::from_value(value)?),
                }
            }
        }

        Ok(())
    }

    pub fn init_logging() {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn exit_code(e: &OpenAlexError) -> i32 {
        if e.is_validation() {
            2
        } else {
            1
        }
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    cli::init_logging();
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(cli::exit_code(&e));
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
