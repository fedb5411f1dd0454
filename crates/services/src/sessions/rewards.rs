use rand::Rng;
use std::collections::HashSet;

use crate::error::RewardConfigError;

//
// ─── CATALOG TYPES ─────────────────────────────────────────────────────────────
//

/// One animal in the reward catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animal {
    pub emoji: &'static str,
    pub name: &'static str,
}

/// A congratulation message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Congratulation {
    pub marathi: &'static str,
    pub english: &'static str,
}

const ANIMALS: &[Animal] = &[
    Animal { emoji: "🦁", name: "Lion" },
    Animal { emoji: "🐘", name: "Elephant" },
    Animal { emoji: "🦒", name: "Giraffe" },
    Animal { emoji: "🐯", name: "Tiger" },
    Animal { emoji: "🦊", name: "Fox" },
    Animal { emoji: "🐼", name: "Panda" },
    Animal { emoji: "🐨", name: "Koala" },
    Animal { emoji: "🦋", name: "Butterfly" },
    Animal { emoji: "🦜", name: "Parrot" },
    Animal { emoji: "🐬", name: "Dolphin" },
    Animal { emoji: "🦩", name: "Flamingo" },
    Animal { emoji: "🦄", name: "Unicorn" },
    Animal { emoji: "🐙", name: "Octopus" },
    Animal { emoji: "🦀", name: "Crab" },
    Animal { emoji: "🐢", name: "Turtle" },
    Animal { emoji: "🦔", name: "Hedgehog" },
    Animal { emoji: "🐝", name: "Bee" },
    Animal { emoji: "🦚", name: "Peacock" },
    Animal { emoji: "🐸", name: "Frog" },
    Animal { emoji: "🦧", name: "Orangutan" },
    Animal { emoji: "🐰", name: "Rabbit" },
    Animal { emoji: "🦉", name: "Owl" },
    Animal { emoji: "🐳", name: "Whale" },
    Animal { emoji: "🦈", name: "Shark" },
];

const IMAGES: &[&str] = &["data/images/dadukli.png", "data/images/tukkal.png"];

const CONGRATULATIONS: &[Congratulation] = &[
    Congratulation { marathi: "शाब्बास!", english: "You're amazing!" },
    Congratulation { marathi: "छान!", english: "Great job!" },
    Congratulation { marathi: "अप्रतिम!", english: "Excellent work!" },
    Congratulation { marathi: "वाह!", english: "Wonderful!" },
    Congratulation { marathi: "खूप छान!", english: "Very good!" },
    Congratulation { marathi: "बरोबर!", english: "Keep it up!" },
    Congratulation { marathi: "मस्त!", english: "You're a star!" },
    Congratulation { marathi: "जबरदस्त!", english: "Fantastic!" },
];

//
// ─── REWARD CATALOG ────────────────────────────────────────────────────────────
//

/// Fixed pools rewards are drawn from.
#[derive(Debug, Clone)]
pub struct RewardCatalog {
    animals: Vec<Animal>,
    images: Vec<&'static str>,
    messages: Vec<Congratulation>,
}

impl RewardCatalog {
    /// The built-in catalog shipped with the game.
    ///
    /// # Panics
    ///
    /// Never panics; the built-in pools are non-empty.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            ANIMALS.to_vec(),
            IMAGES.to_vec(),
            CONGRATULATIONS.to_vec(),
        )
        .expect("built-in catalog is non-empty")
    }

    /// Creates a catalog from custom pools.
    ///
    /// # Errors
    ///
    /// Returns `RewardConfigError` if any pool is empty. This is a
    /// startup-time configuration check; picks never fail later.
    pub fn new(
        animals: Vec<Animal>,
        images: Vec<&'static str>,
        messages: Vec<Congratulation>,
    ) -> Result<Self, RewardConfigError> {
        if animals.is_empty() {
            return Err(RewardConfigError::NoAnimals);
        }
        if images.is_empty() {
            return Err(RewardConfigError::NoImages);
        }
        if messages.is_empty() {
            return Err(RewardConfigError::NoMessages);
        }
        Ok(Self {
            animals,
            images,
            messages,
        })
    }

    #[must_use]
    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }
}

//
// ─── REWARD ────────────────────────────────────────────────────────────────────
//

/// One reward presented to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub animal: Animal,
    /// Fair-coin cosmetic: the animal left a little surprise.
    pub with_poop: bool,
    pub image: &'static str,
    pub message: Congratulation,
}

impl Reward {
    /// Emoji string as shown to the player.
    #[must_use]
    pub fn emoji_display(&self) -> String {
        if self.with_poop {
            format!("{}💩", self.animal.emoji)
        } else {
            self.animal.emoji.to_owned()
        }
    }
}

//
// ─── REWARD PICKER ─────────────────────────────────────────────────────────────
//

/// Session-scoped reward selection.
///
/// Animals do not repeat until every animal in the catalog has been
/// shown once; the used-set is then cleared and the cycle starts over.
/// Image and message picks are uniform and unconstrained.
#[derive(Debug, Default)]
pub struct RewardPicker {
    used: HashSet<usize>,
}

impl RewardPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget which animals have been shown (session start).
    pub fn reset(&mut self) {
        self.used.clear();
    }

    /// Pick the next reward.
    pub fn pick<R: Rng + ?Sized>(&mut self, catalog: &RewardCatalog, rng: &mut R) -> Reward {
        if self.used.len() >= catalog.animals.len() {
            self.used.clear();
        }

        let available: Vec<usize> = (0..catalog.animals.len())
            .filter(|i| !self.used.contains(i))
            .collect();
        let animal_index = available[rng.random_range(0..available.len())];
        self.used.insert(animal_index);

        Reward {
            animal: catalog.animals[animal_index].clone(),
            with_poop: rng.random_bool(0.5),
            image: catalog.images[rng.random_range(0..catalog.images.len())],
            message: catalog.messages[rng.random_range(0..catalog.messages.len())].clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
