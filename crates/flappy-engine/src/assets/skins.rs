use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::error::SkinError;

/// A selectable player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// Flavour text shown on the character card.
    pub power: String,
    /// Image URL or data URL; `None` draws the default glyph.
    #[serde(default)]
    pub image: Option<String>,
    /// Shown on the card when there is no image.
    pub emoji: String,
}

impl Character {
    fn new(id: &str, name: &str, power: &str, emoji: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            power: power.to_string(),
            image: None,
            emoji: emoji.to_string(),
        }
    }
}

/// On-disk / over-the-wire form of the catalog.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    characters: Vec<Character>,
    #[serde(default)]
    selected: Option<String>,
}

/// The characters on offer plus which one is selected. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinCatalog {
    characters: Vec<Character>,
    selected: usize,
}

impl SkinCatalog {
    /// Parse a catalog from JSON.
    /// A missing or unknown `selected` id falls back to the first character.
    pub fn from_json(json: &str) -> Result<Self, SkinError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        if file.characters.is_empty() {
            return Err(SkinError::Empty);
        }
        let mut seen = HashSet::with_capacity(file.characters.len());
        for character in &file.characters {
            if !seen.insert(character.id.as_str()) {
                return Err(SkinError::DuplicateId(character.id.clone()));
            }
        }
        let selected = file
            .selected
            .as_deref()
            .and_then(|id| file.characters.iter().position(|c| c.id == id))
            .unwrap_or(0);
        Ok(Self {
            characters: file.characters,
            selected,
        })
    }

    pub fn to_json(&self) -> Result<String, SkinError> {
        let file = CatalogFile {
            characters: self.characters.clone(),
            selected: Some(self.selected().id.clone()),
        };
        Ok(serde_json::to_string(&file)?)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn selected(&self) -> &Character {
        &self.characters[self.selected]
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn select(&mut self, id: &str) -> Result<&Character, SkinError> {
        self.selected = self.index_of(id)?;
        Ok(self.selected())
    }

    /// Select the next character, wrapping to the first.
    pub fn next(&mut self) -> &Character {
        self.selected = (self.selected + 1) % self.characters.len();
        self.selected()
    }

    /// Select the previous character, wrapping to the last.
    pub fn previous(&mut self) -> &Character {
        let len = self.characters.len();
        self.selected = (self.selected + len - 1) % len;
        self.selected()
    }

    pub fn set_image(&mut self, id: &str, image: Option<String>) -> Result<(), SkinError> {
        self.character_mut(id)?.image = image;
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), SkinError> {
        self.character_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_power(&mut self, id: &str, power: &str) -> Result<(), SkinError> {
        self.character_mut(id)?.power = power.to_string();
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, SkinError> {
        self.characters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SkinError::UnknownSkin(id.to_string()))
    }

    fn character_mut(&mut self, id: &str) -> Result<&mut Character, SkinError> {
        let index = self.index_of(id)?;
        Ok(&mut self.characters[index])
    }
}

impl Default for SkinCatalog {
    fn default() -> Self {
        Self {
            characters: vec![
                Character::new("chad", "Gigachad Gary", "💪 Never skips flap day", "😎"),
                Character::new("karen", "Karen the Karen", "🗣️ Demands to see the pipe manager", "💅"),
                Character::new("sleepy", "Sleepy Steve", "😴 Falls asleep mid-flight", "🥱"),
                Character::new("confused", "Confused Carl", "🤔 Which way is up again?", "🙃"),
            ],
            selected: 0,
        }
    }
}
