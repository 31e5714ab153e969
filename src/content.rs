use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::{seq::SliceRandom, Rng};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::error::Error;

static CONTENT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/content");

/// number of key groups in a generated lesson drill
const LESSON_GROUPS: usize = 100;

/// width of the keyboard preview row shown on lesson cards
pub const PREVIEW_KEYS: usize = 10;

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Next difficulty in the cycle easy -> medium -> hard -> easy
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        <Difficulty as ValueEnum>::from_str(s, true).ok()
    }
}

#[derive(Deserialize, Clone, Debug)]
struct Pools {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl Pools {
    fn get(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// A row drill offered in the lesson browser
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Lesson {
    pub title: String,
    pub keys: String,
    pub desc: String,
}

impl Lesson {
    /// Builds a drill of random 2-4 character groups drawn from the lesson keys
    pub fn practice_text<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let keys: Vec<char> = self.keys.chars().collect();
        if keys.is_empty() {
            return String::new();
        }

        (0..LESSON_GROUPS)
            .map(|_| {
                let len = rng.gen_range(2..=4);
                (0..len)
                    .filter_map(|_| keys.choose(rng).copied())
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// Keys laid out on a fixed-width preview row, padded with blanks
    pub fn preview(&self) -> Vec<Option<char>> {
        let mut row: Vec<Option<char>> = self.keys.chars().take(PREVIEW_KEYS).map(Some).collect();
        row.resize(PREVIEW_KEYS, None);
        row
    }
}

/// Static word lists, paragraph pools and lessons bundled with the binary
#[derive(Clone, Debug)]
pub struct ContentTables {
    words: Pools,
    paragraphs: Pools,
    lessons: Vec<Lesson>,
}

impl ContentTables {
    pub fn embedded() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            words: read_content("words.json")?,
            paragraphs: read_content("paragraphs.json")?,
            lessons: read_content("lessons.json")?,
        })
    }

    pub fn words(&self, difficulty: Difficulty) -> &[String] {
        self.words.get(difficulty)
    }

    pub fn paragraphs(&self, difficulty: Difficulty) -> &[String] {
        self.paragraphs.get(difficulty)
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, idx: usize) -> Option<&Lesson> {
        self.lessons.get(idx)
    }

    /// The difficulty's paragraph pool in random order, joined by spaces
    pub fn test_prompt<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> String {
        let mut pool = self.paragraphs(difficulty).to_vec();
        pool.shuffle(rng);
        pool.join(" ")
    }
}

fn read_content<T: DeserializeOwned>(file_name: &str) -> Result<T, Box<dyn Error>> {
    let file = CONTENT_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("content file {file_name} not found"))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| format!("content file {file_name} is not utf-8"))?;

    Ok(serde_json::from_str(contents)?)
}
