//! The recipe editor: form fields, steps table, and the file it saves to.
//!
//! This is the editing model behind both the terminal dialog and the CLI.
//! Views read from it and forward user actions to it; a fresh [`Recipe`] is
//! harvested from it only when saving.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::{Bean, BeanSource, Recipe, RoastDescription, Step};
use crate::storage::{self, RecipeStore};
use crate::table::{self, StepRow, StepTable};

/// A text input of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Creator,
    RoastType,
    BeanRegion,
    BeanCountry,
    BeanLink,
    BeanStore,
    Description,
}

impl Field {
    /// Fields in display order.
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Creator,
        Self::RoastType,
        Self::BeanRegion,
        Self::BeanCountry,
        Self::BeanLink,
        Self::BeanStore,
        Self::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Recipe Name",
            Self::Creator => "Created by",
            Self::RoastType => "Roast Type",
            Self::BeanRegion => "Bean Region",
            Self::BeanCountry => "Bean Country",
            Self::BeanLink => "Bean Link",
            Self::BeanStore => "Bean Store Name",
            Self::Description => "Description",
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, Self::Description)
    }
}

/// Current text of every form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeForm {
    pub name: String,
    pub creator: String,
    pub roast_type: String,
    pub bean_region: String,
    pub bean_country: String,
    pub bean_link: String,
    pub bean_store: String,
    pub description: String,
}

impl RecipeForm {
    /// Copies every scalar value of a recipe into the form.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.roast_name.clone(),
            creator: recipe.creator.clone(),
            roast_type: recipe.roast_description.roast_type.clone(),
            bean_region: recipe.bean.region.clone(),
            bean_country: recipe.bean.country.clone(),
            bean_link: recipe.bean.source.link.clone(),
            bean_store: recipe.bean.source.reseller.clone(),
            description: recipe.roast_description.description.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Creator => &self.creator,
            Field::RoastType => &self.roast_type,
            Field::BeanRegion => &self.bean_region,
            Field::BeanCountry => &self.bean_country,
            Field::BeanLink => &self.bean_link,
            Field::BeanStore => &self.bean_store,
            Field::Description => &self.description,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Creator => &mut self.creator,
            Field::RoastType => &mut self.roast_type,
            Field::BeanRegion => &mut self.bean_region,
            Field::BeanCountry => &mut self.bean_country,
            Field::BeanLink => &mut self.bean_link,
            Field::BeanStore => &mut self.bean_store,
            Field::Description => &mut self.description,
        }
    }
}

/// Where an editor stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Fresh recipe with no associated file.
    New,

    /// Populated from a file, not yet edited.
    Loaded,

    /// Edited since it was opened or last saved.
    Editing,

    /// Written to its associated file, no edits since.
    Saved,
}

/// A single recipe being edited.
#[derive(Debug, Clone)]
pub struct RecipeEditor {
    form: RecipeForm,
    table: StepTable,
    file: Option<PathBuf>,
    state: EditorState,
}

impl RecipeEditor {
    /// An empty recipe with one placeholder step.
    pub fn new() -> Self {
        Self {
            form: RecipeForm::default(),
            table: StepTable::default(),
            file: None,
            state: EditorState::New,
        }
    }

    /// Loads a recipe file into a new editor.
    ///
    /// Nothing is populated if the file is malformed or incomplete.
    pub fn open(path: &Path) -> storage::Result<Self> {
        let recipe = storage::load(path)?;
        Self::from_recipe(&recipe)
            .map_err(|_| storage::StorageError::NoSteps(path.to_path_buf()))
    }

    /// Populates an editor from an in-memory recipe, keeping its file.
    ///
    /// Refused with [`table::TableError::LastStep`] when the recipe has no
    /// steps.
    pub fn from_recipe(recipe: &Recipe) -> table::Result<Self> {
        let state = if recipe.file.is_some() {
            EditorState::Loaded
        } else {
            EditorState::New
        };
        Ok(Self {
            form: RecipeForm::from_recipe(recipe),
            table: StepTable::from_steps(&recipe.steps)?,
            file: recipe.file.clone(),
            state,
        })
    }

    pub fn table(&self) -> &StepTable {
        &self.table
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn field(&self, field: Field) -> &str {
        self.form.get(field)
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.form.get_mut(field) = value.into();
        self.touch();
    }

    /// Applies an in-place change to one field's text.
    pub fn edit_field(&mut self, field: Field, edit: impl FnOnce(&mut String)) {
        edit(self.form.get_mut(field));
        self.touch();
    }

    /// The steps as currently shown in the table.
    pub fn steps(&self) -> Vec<Step> {
        self.table.read()
    }

    pub fn move_step_up(&mut self, row: usize) -> table::Result<()> {
        self.table.move_up(row)?;
        self.touch();
        Ok(())
    }

    pub fn move_step_down(&mut self, row: usize) -> table::Result<()> {
        self.table.move_down(row)?;
        self.touch();
        Ok(())
    }

    /// Deletes a step. Refused with [`table::TableError::LastStep`] when it
    /// is the only one; the table is left unchanged.
    pub fn delete_step(&mut self, row: usize) -> table::Result<()> {
        self.table.delete(row)?;
        self.touch();
        Ok(())
    }

    pub fn insert_step_below(&mut self, row: usize) -> table::Result<()> {
        self.table.insert_below(row)?;
        self.touch();
        Ok(())
    }

    /// Applies a change to one row's selectors.
    pub fn edit_row(&mut self, row: usize, edit: impl FnOnce(&mut StepRow)) -> table::Result<()> {
        edit(self.table.row_mut(row)?);
        self.touch();
        Ok(())
    }

    /// Builds a fresh recipe from the current form and table, with
    /// `total_time` recomputed.
    pub fn harvest(&self) -> Recipe {
        let form = &self.form;
        let mut recipe = Recipe {
            roast_name: form.name.clone(),
            steps: self.table.read(),
            roast_description: RoastDescription {
                roast_type: form.roast_type.clone(),
                description: form.description.clone(),
            },
            creator: form.creator.clone(),
            bean: Bean {
                region: form.bean_region.clone(),
                country: form.bean_country.clone(),
                source: BeanSource {
                    link: form.bean_link.clone(),
                    reseller: form.bean_store.clone(),
                },
            },
            total_time: 0,
            file: self.file.clone(),
        };
        recipe.refresh_total_time();
        recipe
    }

    /// The file a save would write: the associated file, or a new path in
    /// the store derived from the recipe name.
    pub fn target_path(&self, store: &RecipeStore) -> storage::Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => store.path_for_new(&self.form.name),
        }
    }

    /// Writes the recipe and makes the written file its associated file.
    pub fn save(&mut self, store: &RecipeStore) -> storage::Result<PathBuf> {
        let path = self.target_path(store)?;
        let recipe = self.harvest();
        debug!(path = %path.display(), steps = recipe.steps.len(), "saving recipe");
        storage::write(&recipe, &path)?;
        self.file = Some(path.clone());
        self.state = EditorState::Saved;
        Ok(path)
    }

    fn touch(&mut self) {
        self.state = EditorState::Editing;
    }
}

impl Default for RecipeEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use crate::model::FanSpeed;
    use crate::table::TableError;

    fn test_store() -> (TempDir, RecipeStore) {
        let dir = TempDir::new().unwrap();
        let store = RecipeStore::new(dir.path().join("Openroast").join("Recipes").join("My Recipes"));
        (dir, store)
    }

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("sample.json");
        let doc = json!({
            "roastName": "Kenya AA",
            "creator": "Sam",
            "roastDescription": {"roastType": "City+", "description": "Bright.\nJuicy."},
            "bean": {
                "region": "Nyeri",
                "country": "Kenya",
                "source": {"link": "https://example.com/kenya", "reseller": "Greens"}
            },
            "totalTime": 1,
            "steps": [
                {"sectionTime": 30, "fanSpeed": 9, "targetTemp": 155},
                {"sectionTime": 45, "fanSpeed": 6, "targetTemp": 400},
                {"sectionTime": 125, "fanSpeed": 9, "cooling": true}
            ]
        });
        fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        path
    }

    #[test]
    fn new_editor_has_placeholder_step() {
        let editor = RecipeEditor::new();
        assert_eq!(editor.state(), EditorState::New);
        assert!(editor.file().is_none());
        assert_eq!(editor.steps(), vec![Step::default()]);
        assert_eq!(editor.field(Field::Name), "");
    }

    #[test]
    fn open_preloads_every_field() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(dir.path());
        let editor = RecipeEditor::open(&path).unwrap();

        assert_eq!(editor.state(), EditorState::Loaded);
        assert_eq!(editor.file(), Some(path.as_path()));
        assert_eq!(editor.field(Field::Name), "Kenya AA");
        assert_eq!(editor.field(Field::Creator), "Sam");
        assert_eq!(editor.field(Field::RoastType), "City+");
        assert_eq!(editor.field(Field::BeanRegion), "Nyeri");
        assert_eq!(editor.field(Field::BeanCountry), "Kenya");
        assert_eq!(editor.field(Field::BeanLink), "https://example.com/kenya");
        assert_eq!(editor.field(Field::BeanStore), "Greens");
        assert_eq!(editor.field(Field::Description), "Bright.\nJuicy.");
        assert_eq!(editor.steps().len(), 3);
    }

    #[test]
    fn from_recipe_without_steps_is_refused() {
        let recipe = Recipe {
            steps: Vec::new(),
            ..Recipe::default()
        };
        assert!(matches!(
            RecipeEditor::from_recipe(&recipe),
            Err(TableError::LastStep)
        ));
    }

    #[test]
    fn from_recipe_keeps_steps_and_file() {
        let recipe = Recipe {
            roast_name: "Kept".into(),
            file: Some(PathBuf::from("/r/kept.json")),
            ..Recipe::default()
        };
        let editor = RecipeEditor::from_recipe(&recipe).unwrap();

        assert_eq!(editor.state(), EditorState::Loaded);
        assert_eq!(editor.field(Field::Name), "Kept");
        assert_eq!(editor.steps(), recipe.steps);
    }

    #[test]
    fn open_incomplete_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"roastName": "x", "creator": "y"}"#).unwrap();

        assert!(RecipeEditor::open(&path).is_err());
    }

    #[test]
    fn save_without_edits_preserves_fields_and_recomputes_total() {
        let (_dir, store) = test_store();
        let dir = TempDir::new().unwrap();
        let path = write_sample(dir.path());
        let original = storage::load(&path).unwrap();

        let mut editor = RecipeEditor::open(&path).unwrap();
        let saved_to = editor.save(&store).unwrap();
        assert_eq!(saved_to, path);

        let saved = storage::load(&path).unwrap();
        assert_eq!(saved.roast_name, original.roast_name);
        assert_eq!(saved.creator, original.creator);
        assert_eq!(saved.roast_description, original.roast_description);
        assert_eq!(saved.bean, original.bean);
        assert_eq!(saved.steps, original.steps);
        assert_eq!(saved.total_time, 200);
        assert_eq!(editor.state(), EditorState::Saved);
    }

    #[test]
    fn off_grid_and_cooling_steps_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(dir.path());
        let (_store_dir, store) = test_store();

        let mut editor = RecipeEditor::open(&path).unwrap();
        editor.save(&store).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["steps"][0]["targetTemp"], 155);
        assert_eq!(doc["steps"][2]["cooling"], true);
        assert!(doc["steps"][2].get("targetTemp").is_none());
        assert!(doc.get("file").is_none());
    }

    #[test]
    fn save_with_huge_section_times_writes_exact_total() {
        let dir = TempDir::new().unwrap();
        let (_store_dir, store) = test_store();
        let path = dir.path().join("long.json");
        let doc = json!({
            "roastName": "Long",
            "creator": "Sam",
            "roastDescription": {"roastType": "", "description": ""},
            "bean": {"region": "", "country": "", "source": {"link": "", "reseller": ""}},
            "steps": [
                {"sectionTime": 3_000_000_000_u32, "fanSpeed": 5, "targetTemp": 150},
                {"sectionTime": 3_000_000_000_u32, "fanSpeed": 9, "cooling": true}
            ]
        });
        fs::write(&path, doc.to_string()).unwrap();

        let mut editor = RecipeEditor::open(&path).unwrap();
        editor.save(&store).unwrap();

        let saved = storage::load(&path).unwrap();
        assert_eq!(saved.total_time, 6_000_000_000);
    }

    #[test]
    fn save_new_recipe_derives_path_and_creates_directories() {
        let (_dir, store) = test_store();
        let mut editor = RecipeEditor::new();
        editor.set_field(Field::Name, "My Roast!");

        let path = editor.save(&store).unwrap();

        assert_eq!(path, store.root().join("My_Roast.json"));
        assert!(path.is_file());
        assert_eq!(editor.file(), Some(path.as_path()));
        assert_eq!(editor.state(), EditorState::Saved);
    }

    #[test]
    fn second_save_reuses_associated_file() {
        let (_dir, store) = test_store();
        let mut editor = RecipeEditor::new();
        editor.set_field(Field::Name, "Twice");
        let first = editor.save(&store).unwrap();

        editor.set_field(Field::Name, "Renamed");
        assert_eq!(editor.state(), EditorState::Editing);
        let second = editor.save(&store).unwrap();

        assert_eq!(first, second);
        assert_eq!(storage::load(&second).unwrap().roast_name, "Renamed");
    }

    #[test]
    fn save_new_recipe_with_unusable_name_fails() {
        let (_dir, store) = test_store();
        let mut editor = RecipeEditor::new();
        editor.set_field(Field::Name, "***");

        assert!(editor.save(&store).is_err());
        assert!(editor.file().is_none());
    }

    #[test]
    fn total_time_sums_section_times() {
        let mut editor = RecipeEditor::new();
        editor.insert_step_below(0).unwrap();
        editor.insert_step_below(1).unwrap();
        for (row, text) in ["00:30", "00:45", "02:05"].into_iter().enumerate() {
            editor
                .edit_row(row, |r| r.duration.set_text(text).unwrap())
                .unwrap();
        }

        assert_eq!(editor.harvest().total_time, 200);
    }

    #[test]
    fn harvest_takes_text_verbatim() {
        let mut editor = RecipeEditor::new();
        editor.set_field(Field::Name, "  spaced  ");
        editor.edit_field(Field::Description, |s| s.push_str("line one\nline two"));

        let recipe = editor.harvest();
        assert_eq!(recipe.roast_name, "  spaced  ");
        assert_eq!(recipe.roast_description.description, "line one\nline two");
    }

    #[test]
    fn delete_last_step_leaves_editor_unchanged() {
        let mut editor = RecipeEditor::new();
        let err = editor.delete_step(0).unwrap_err();

        assert!(matches!(err, TableError::LastStep));
        assert_eq!(editor.steps(), vec![Step::default()]);
        assert_eq!(editor.state(), EditorState::New);
    }

    #[test]
    fn row_edits_mark_editing() {
        let mut editor = RecipeEditor::new();
        editor
            .edit_row(0, |r| r.fan.select(FanSpeed::MAX))
            .unwrap();

        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.steps()[0].fan_speed(), FanSpeed::MAX);
    }
}
