//! Deterministic names for generated players and clubs.
//!
//! All generation is deterministic (same RNG stream = same names).

use crate::rng::SimRng;

/// Deterministic name generator using curated name lists
pub struct NameGenerator;

impl NameGenerator {
    /// Player name (first + last)
    pub fn player_name(rng: &mut SimRng) -> String {
        let first = Self::pick(rng, Self::first_names());
        let last = Self::pick(rng, Self::last_names());
        format!("{first} {last}")
    }

    /// `count` distinct club names with their three-letter short names.
    /// Towns are drawn without replacement, so names never repeat.
    pub fn club_names(rng: &mut SimRng, count: usize) -> Vec<(String, String)> {
        let mut towns: Vec<&'static str> = Self::towns().to_vec();
        rng.shuffle(&mut towns);
        let suffixes = Self::club_suffixes();

        (0..count)
            .map(|i| {
                let town = towns[i % towns.len()];
                let suffix = Self::pick(rng, suffixes);
                // Past the town list, number the reserves to keep names unique.
                let name = match i / towns.len() {
                    0 => format!("{town} {suffix}"),
                    n => format!("{town} {suffix} {}", n + 1),
                };
                let short: String = town.chars().filter(|c| c.is_ascii_alphabetic()).take(3).collect();
                (name, short.to_uppercase())
            })
            .collect()
    }

    fn pick(rng: &mut SimRng, list: &'static [&'static str]) -> &'static str {
        list[rng.pick_index(list.len())]
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "Luca", "Mateo", "Noah", "Oliver", "Lucas", "Hugo", "Leo", "Marco",
            "Diego", "Rafael", "Tomas", "Jonas", "Erik", "Mikkel", "Kasper", "Sander",
            "Jakub", "Piotr", "Milan", "Nikola", "Luka", "Ivan", "Andrei", "Bruno",
            "Joao", "Pedro", "Thiago", "Gabriel", "Samuel", "Daniel", "Adrian", "Victor",
            "Kwame", "Kofi", "Yaw", "Emeka", "Chidi", "Sadio", "Moussa", "Ibrahim",
            "Youssef", "Karim", "Hakim", "Amine", "Kenji", "Takumi", "Min-jae", "Ji-sung",
            "Callum", "Declan", "Connor", "Reece", "Jamie", "Harry", "Mason", "Jordan",
            "Ethan", "Aaron", "Ben", "Kieran", "Ruben", "Stefan", "Florian", "Timo",
            "Kai", "Leon", "Niklas", "Antoine", "Theo", "Jules", "Kylian", "Ousmane",
            "Federico", "Nicolo", "Alessandro", "Sergio", "Alvaro", "Pablo", "Iker",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Walker", "Hughes", "Foster", "Barnes", "Clarke", "Reid", "Murray",
            "Silva", "Santos", "Costa", "Pereira", "Fernandes", "Gomes", "Moreno", "Ruiz",
            "Navarro", "Romero", "Rossi", "Bianchi", "Ferrari", "Esposito", "Conti",
            "Muller", "Schmidt", "Wagner", "Becker", "Hoffmann", "Richter", "Neumann",
            "Jensen", "Nielsen", "Larsen", "Berg", "Lindqvist", "Eriksen", "Haaland",
            "Novak", "Kovac", "Horvat", "Petrovic", "Jovanovic", "Nowak", "Kowalski",
            "Dubois", "Laurent", "Moreau", "Girard", "Lefebvre", "Mendy", "Diallo",
            "Traore", "Kone", "Toure", "Mensah", "Owusu", "Okafor", "Adeyemi", "Nwosu",
            "El Amrani", "Benali", "Haddad", "Tanaka", "Suzuki", "Kim", "Park", "Son",
            "De Jong", "Van Dijk", "Bakker", "Visser", "Janssen", "Peeters", "Maes",
            "O'Brien", "Byrne", "Doyle", "Kelly", "Walsh", "Campbell", "Stewart",
        ]
    }

    fn towns() -> &'static [&'static str] {
        &[
            "Ashford", "Bramley", "Castleton", "Dunmore", "Eastwick", "Fairhaven",
            "Glenbrook", "Harrowgate", "Ironbridge", "Kingsbury", "Longmere",
            "Marlow", "Northam", "Oakridge", "Portsea", "Queensferry", "Redcliffe",
            "Stonehill", "Thornbury", "Upton", "Valemouth", "Westmoor", "Yarrow",
            "Ambleside", "Blackwater", "Coldharbour", "Deepdale", "Elmstead",
        ]
    }

    fn club_suffixes() -> &'static [&'static str] {
        &[
            "United", "City", "Town", "Rovers", "Athletic", "Wanderers", "Albion",
            "Rangers", "County", "Borough", "FC",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, RngSlot};
    use std::collections::HashSet;

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_slot_at_tick(RngSlot::World, 0);
        let mut rng2 = RngBank::new(12345).for_slot_at_tick(RngSlot::World, 0);

        assert_eq!(
            NameGenerator::player_name(&mut rng1),
            NameGenerator::player_name(&mut rng2),
            "Same seed should produce same name"
        );
        assert_eq!(
            NameGenerator::club_names(&mut rng1, 20),
            NameGenerator::club_names(&mut rng2, 20),
        );
    }

    #[test]
    fn generates_valid_player_names() {
        let mut rng = RngBank::new(12345).for_slot_at_tick(RngSlot::World, 0);

        for _ in 0..100 {
            let name = NameGenerator::player_name(&mut rng);
            assert!(name.split_whitespace().count() >= 2, "Name should have first and last parts: {name}");
        }
    }

    #[test]
    fn club_names_are_unique_even_past_the_town_list() {
        let mut rng = RngBank::new(7).for_slot_at_tick(RngSlot::World, 0);
        let clubs = NameGenerator::club_names(&mut rng, 40);

        let names: HashSet<_> = clubs.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names.len(), 40, "club names must not repeat");
        assert!(clubs.iter().all(|(_, short)| short.len() == 3), "short names are three letters");
    }
}
