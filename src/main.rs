//! Terminal host shim for the ladle application core.
//!
//! Wires the session runtime to a plain stdin/stdout host: line-based
//! commands stand in for UI events and each view surface prints to stdout.
//! The library is the product; this binary exists to exercise it end to end
//! against a live recipe service.

use std::io::{BufRead, Write as _};
use std::path::PathBuf;

use ladle::domain::RecipeDraft;
use ladle::remote::HttpRecipeApi;
use ladle::storage::JsonFileStore;
use ladle::{
    observability, Config, Event, LadleError, MemoryLocation, Result, Session, Surface, SurfaceId,
    SurfaceRegistry, ViewData,
};

/// Stdout-printing view surface, one per UI region.
struct ConsoleSurface {
    label: &'static str,
}

impl ConsoleSurface {
    fn boxed(label: &'static str) -> Box<dyn Surface + Send> {
        Box::new(Self { label })
    }
}

impl Surface for ConsoleSurface {
    fn render(&mut self, data: &ViewData) {
        match data {
            ViewData::Recipe(recipe) => {
                println!("[{}] {} by {}", self.label, recipe.title, recipe.publisher);
                println!(
                    "[{}] serves {}, ready in {} min{}",
                    self.label,
                    recipe.servings,
                    recipe.cooking_minutes,
                    if recipe.bookmarked { ", bookmarked" } else { "" }
                );
                for ingredient in &recipe.ingredients {
                    match ingredient.quantity {
                        Some(q) => println!(
                            "[{}]   {q} {} {}",
                            self.label, ingredient.unit, ingredient.description
                        ),
                        None => println!(
                            "[{}]   {} {}",
                            self.label, ingredient.unit, ingredient.description
                        ),
                    }
                }
            }
            ViewData::Results(results) => {
                for result in results {
                    println!("[{}] {}  {}", self.label, result.id, result.title);
                }
                if results.is_empty() {
                    println!("[{}] no results on this page", self.label);
                }
            }
            ViewData::Pagination { page, page_count } => {
                println!("[{}] page {page} of {page_count}", self.label);
            }
            ViewData::Bookmarks(bookmarks) => {
                println!("[{}] {} bookmarked", self.label, bookmarks.len());
                for recipe in bookmarks {
                    println!("[{}]   {}  {}", self.label, recipe.id, recipe.title);
                }
            }
            ViewData::Message(message) => println!("[{}] {message}", self.label),
        }
    }

    fn update(&mut self, data: &ViewData) {
        self.render(data);
    }

    fn render_spinner(&mut self) {
        println!("[{}] loading...", self.label);
    }

    fn render_error(&mut self, message: &str) {
        println!("[{}] error: {message}", self.label);
    }

    fn close(&mut self) {
        println!("[{}] closed", self.label);
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

fn load_config() -> Result<Config> {
    let path = home_dir().join(".config/ladle/config.toml");
    if path.exists() {
        Config::from_file(&path)
    } else {
        Ok(Config::default())
    }
}

fn surfaces() -> SurfaceRegistry {
    let mut registry = SurfaceRegistry::new();
    registry.register(SurfaceId::Recipe, ConsoleSurface::boxed("recipe"));
    registry.register(SurfaceId::Results, ConsoleSurface::boxed("results"));
    registry.register(SurfaceId::Pagination, ConsoleSurface::boxed("pages"));
    registry.register(SurfaceId::Bookmarks, ConsoleSurface::boxed("bookmarks"));
    registry.register(SurfaceId::AddRecipe, ConsoleSurface::boxed("upload"));
    registry
}

fn print_help() {
    println!("commands:");
    println!("  search <query>      search for recipes");
    println!("  open <id>           open a recipe");
    println!("  page <n>            show result page n");
    println!("  servings <n>        rescale the open recipe");
    println!("  bookmark            toggle bookmark on the open recipe");
    println!("  upload <title> <ingredient>[;<ingredient>...]");
    println!("  quit");
}

fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    let (command, rest) = match line.split_once(' ') {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        "search" => Some(Event::SearchSubmitted {
            query: rest.to_string(),
        }),
        "open" => Some(Event::RecipeSelected {
            id: rest.to_string(),
        }),
        "page" => rest.parse().ok().map(|page| Event::PageRequested { page }),
        "servings" => rest
            .parse()
            .ok()
            .map(|servings| Event::ServingsAdjusted { servings }),
        "bookmark" => Some(Event::BookmarkToggled),
        "upload" => {
            let (title, ingredients) = rest.split_once(' ')?;
            Some(Event::RecipeSubmitted {
                draft: RecipeDraft {
                    title: title.to_string(),
                    source_url: String::new(),
                    image_url: String::new(),
                    publisher: "ladle".to_string(),
                    cooking_minutes: 30,
                    servings: 4,
                    ingredients: ingredients.split(';').map(String::from).collect(),
                },
            })
        }
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    observability::init_tracing(&config);

    let api = HttpRecipeApi::new(config.api_url.clone(), config.api_key.clone())
        .map_err(|e| LadleError::Config(e.to_string()))?;
    let store = JsonFileStore::open(home_dir().join(".local/share/ladle/ladle.json"))?;

    let mut session = Session::new(
        config,
        Box::new(api),
        Box::new(store),
        surfaces(),
        Box::new(MemoryLocation::new()),
    );
    session.start().await;

    print_help();
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed == "quit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        match parse_command(trimmed) {
            Some(event) => {
                session.dispatch(event).await;
                session.flush_scheduled().await;
            }
            None => print_help(),
        }
    }

    Ok(())
}
