//! CLI interface for roastbook.
//!
//! `roastbook edit` opens the interactive editor; every other subcommand is
//! non-interactive: arguments in, text out.
//!
//! The recipes directory comes from `--recipes-dir`, `ROASTBOOK_RECIPES_DIR`,
//! the config file, or the Openroast default, in that order.

mod format;
mod step;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::editor::{Field, RecipeEditor};
use crate::storage::{self, RecipeStore};
use crate::tui;

use format::{format_entry, format_recipe};
use step::{StepAction, cmd_step};

/// roastbook — create and edit coffee roast recipes.
#[derive(Debug, Parser)]
#[command(name = "roastbook", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Directory new recipes are saved into and listed from.
    #[arg(long, global = true)]
    recipes_dir: Option<PathBuf>,

    /// Defaults to `edit` with a new recipe.
    #[command(subcommand)]
    pub command: Option<Command>,
}

const WORKFLOW_HELP: &str = r#"Workflow: building a recipe
  1. roastbook new --name "Kenya AA" --creator sam
     → prints the path of the saved recipe
  2. roastbook step Kenya_AA.json insert 1
  3. roastbook step Kenya_AA.json set 2 --temp 420 --fan 6 --time 05:30
  4. roastbook step Kenya_AA.json insert 2
  5. roastbook step Kenya_AA.json set 3 --cooling --fan 9 --time 03:00
  6. roastbook show Kenya_AA.json

Or edit interactively:
  roastbook edit Kenya_AA.json"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive recipe editor.
    ///
    /// Without a path, starts a new recipe that is saved into the recipes
    /// directory under a name derived from the recipe name.
    Edit {
        /// Recipe file to load.
        path: Option<PathBuf>,
    },

    /// Create a recipe with one default step and save it. Prints its path.
    New {
        /// Recipe name; also determines the file name.
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        creator: String,

        #[arg(long, default_value = "")]
        roast_type: String,

        /// Bean region.
        #[arg(long, default_value = "")]
        region: String,

        /// Bean country.
        #[arg(long, default_value = "")]
        country: String,

        /// Link to the beans.
        #[arg(long, default_value = "")]
        link: String,

        /// Store the beans were bought from.
        #[arg(long, default_value = "")]
        store: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List recipes in the recipes directory.
    List,

    /// Print a recipe.
    Show {
        /// Recipe file to print.
        path: PathBuf,

        /// Print the JSON that a save would write instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Reorder, insert, delete, or change steps of a saved recipe.
    ///
    /// The recipe is saved in place after the change.
    Step {
        /// Recipe file to change.
        path: PathBuf,

        #[command(subcommand)]
        action: StepAction,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let root = config
        .recipes_dir(cli.recipes_dir.as_deref())
        .map_err(|e| e.to_string())?;
    let store = RecipeStore::new(root);

    match cli.command.unwrap_or(Command::Edit { path: None }) {
        Command::Edit { path } => cmd_edit(&store, path),
        Command::New {
            name,
            creator,
            roast_type,
            region,
            country,
            link,
            store: reseller,
            description,
        } => {
            let fields = [
                (Field::Name, name),
                (Field::Creator, creator),
                (Field::RoastType, roast_type),
                (Field::BeanRegion, region),
                (Field::BeanCountry, country),
                (Field::BeanLink, link),
                (Field::BeanStore, reseller),
                (Field::Description, description),
            ];
            cmd_new(&store, fields)
        }
        Command::List => cmd_list(&store),
        Command::Show { path, json } => cmd_show(&path, json),
        Command::Step { path, action } => cmd_step(&store, &path, &action),
    }
}

fn cmd_edit(store: &RecipeStore, path: Option<PathBuf>) -> Result<(), String> {
    let editor = match path {
        Some(path) => RecipeEditor::open(&path)
            .map_err(|e| format!("failed to load {}: {e}", path.display()))?,
        None => RecipeEditor::new(),
    };

    tui::run(editor, store).map_err(|e| format!("editor failed: {e}"))
}

fn cmd_new(store: &RecipeStore, fields: [(Field, String); 8]) -> Result<(), String> {
    let mut editor = RecipeEditor::new();
    for (field, value) in fields {
        editor.set_field(field, value);
    }

    let path = editor
        .save(store)
        .map_err(|e| format!("failed to save recipe: {e}"))?;

    println!("{}", path.display());
    Ok(())
}

fn cmd_list(store: &RecipeStore) -> Result<(), String> {
    let recipes = store
        .list()
        .map_err(|e| format!("failed to list {}: {e}", store.root().display()))?;

    if recipes.is_empty() {
        println!("No recipes in {}", store.root().display());
        return Ok(());
    }

    for entry in &recipes {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn cmd_show(path: &std::path::Path, json: bool) -> Result<(), String> {
    let editor = RecipeEditor::open(path)
        .map_err(|e| format!("failed to load {}: {e}", path.display()))?;
    let recipe = editor.harvest();

    if json {
        let json = storage::to_json(&recipe).map_err(|e| format!("failed to serialize: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", format_recipe(&recipe));
    }
    Ok(())
}
