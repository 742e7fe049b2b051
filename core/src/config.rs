//! Tuning tables. Every number that turns attributes, tactics and time
//! into outcomes lives here, never inline in the engines.

use serde::{Deserialize, Serialize};

use crate::types::{Money, SeasonIndex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub league_name:            String,
    pub first_season:           SeasonIndex,
    pub club_count:             usize,
    pub squad_size:             usize,
    /// Fewest eligible players a club may field.
    pub min_matchday_squad:     usize,
    pub points_win:             u32,
    pub points_draw:            u32,
    pub points_loss:            u32,
    pub season_start_month:     u32,
    pub season_start_day:       u32,
    pub days_between_matchdays: u32,
}

/// Multipliers a mentality applies to a side's attack and defense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MentalityModifier {
    pub attack:  f64,
    pub defense: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MentalityTable {
    pub defensive: MentalityModifier,
    pub balanced:  MentalityModifier,
    pub attacking: MentalityModifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressingModifier {
    pub shots:      f64,
    pub possession: f64,
    pub fouls:      f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressingTable {
    pub low:    PressingModifier,
    pub medium: PressingModifier,
    pub high:   PressingModifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoModifier {
    pub events:     f64,
    pub possession: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoTable {
    pub slow:   TempoModifier,
    pub normal: TempoModifier,
    pub fast:   TempoModifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Per-minute goal probability for two equal sides.
    pub base_goal_rate:       f64,
    /// How sharply the attack/defense ratio bends the goal rate.
    pub strength_exponent:    f64,
    pub max_goal_rate:        f64,
    pub base_shot_rate:       f64,
    pub on_target_ratio:      f64,
    pub base_corner_rate:     f64,
    pub base_foul_rate:       f64,
    pub yellow_per_foul:      f64,
    pub red_per_foul:         f64,
    pub home_advantage:       f64,
    pub mentality:            MentalityTable,
    pub pressing:             PressingTable,
    pub tempo:                TempoTable,
    pub substitution_from:    u8,
    pub substitution_until:   u8,
    pub substitution_rate:    f64,
    pub max_substitutions:    u8,
    pub bench_size:           usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Matchdays a pending offer survives unanswered.
    pub offer_expiry_matchdays: u64,
    /// Chance per matchday advance of an AI bid for one squad player.
    pub incoming_offer_chance:  f64,
    pub bid_fee_min_ratio:      f64,
    pub bid_fee_max_ratio:      f64,
    /// Outgoing bids at or above value × this are always agreed.
    pub accept_ratio:           f64,
    /// Outgoing bids below value × this are always rejected.
    pub reject_ratio:           f64,
    /// Smallest squad a sale may leave behind.
    pub min_squad_after_sale:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutingConfig {
    pub technical_weight:   f64,
    pub physical_weight:    f64,
    pub mental_weight:      f64,
    pub youth_age:          u8,
    pub youth_bonus:        f64,
    pub veteran_age:        u8,
    pub veteran_penalty:    f64,
    /// Score ≥ club reputation + margin → highly recommended.
    pub highly_recommended_margin: f64,
    /// Score ≥ club reputation + margin → recommended. Usually negative.
    pub recommended_margin: f64,
    pub max_delay:          u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceConfig {
    /// Home gate receipts per point of club reputation.
    pub gate_receipts_per_reputation: Money,
    /// Weeks of wages charged on every matchday advance.
    pub wage_weeks_per_matchday:      Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerConfig {
    pub league:       LeagueConfig,
    pub match_engine: MatchConfig,
    pub transfers:    TransferConfig,
    pub scouting:     ScoutingConfig,
    pub finance:      FinanceConfig,
}

impl CareerConfig {
    /// Load from the data/ directory.
    /// In tests, use CareerConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let config = Self {
            league:       read_json(data_dir, "league/league.json")?,
            match_engine: read_json(data_dir, "match/coefficients.json")?,
            transfers:    read_json(data_dir, "market/transfers.json")?,
            scouting:     read_json(data_dir, "scouting/scouting.json")?,
            finance:      read_json(data_dir, "finance/finance.json")?,
        };
        config.validate()?;
        log::info!("config: loaded from {data_dir} ({} clubs)", config.league.club_count);
        Ok(config)
    }

    /// Reject tables that would break the monotonic tactic contract
    /// or make a league unplayable.
    pub fn validate(&self) -> anyhow::Result<()> {
        let m = &self.match_engine;
        let p = &m.pressing;
        if !(p.low.shots <= p.medium.shots && p.medium.shots <= p.high.shots) {
            anyhow::bail!("pressing shot multipliers must not decrease with pressing level");
        }
        if !(p.low.possession <= p.medium.possession && p.medium.possession <= p.high.possession) {
            anyhow::bail!("pressing possession multipliers must not decrease with pressing level");
        }
        let t = &m.tempo;
        if !(t.slow.events <= t.normal.events && t.normal.events <= t.fast.events) {
            anyhow::bail!("tempo event multipliers must not decrease with tempo");
        }
        let me = &m.mentality;
        if !(me.defensive.attack <= me.balanced.attack && me.balanced.attack <= me.attacking.attack) {
            anyhow::bail!("mentality attack multipliers must rise from defensive to attacking");
        }
        if !(me.attacking.defense <= me.balanced.defense && me.balanced.defense <= me.defensive.defense) {
            anyhow::bail!("mentality defense multipliers must fall from defensive to attacking");
        }
        if m.substitution_from > m.substitution_until || m.substitution_until > 90 {
            anyhow::bail!("substitution window must lie inside 1..=90");
        }
        if self.league.club_count < 2 || self.league.club_count % 2 != 0 {
            anyhow::bail!("club_count must be an even number of at least 2");
        }
        if self.league.min_matchday_squad < 11 {
            anyhow::bail!("min_matchday_squad must be at least 11");
        }
        if self.league.squad_size < self.league.min_matchday_squad {
            anyhow::bail!("squad_size must cover min_matchday_squad");
        }
        if self.transfers.reject_ratio > self.transfers.accept_ratio {
            anyhow::bail!("reject_ratio must not exceed accept_ratio");
        }
        Ok(())
    }
}

impl Default for CareerConfig {
    /// Hardcoded defaults, identical to the shipped data/ tables.
    fn default() -> Self {
        Self {
            league: LeagueConfig {
                league_name:            "Premier Division".into(),
                first_season:           2026,
                club_count:             20,
                squad_size:             22,
                min_matchday_squad:     11,
                points_win:             3,
                points_draw:            1,
                points_loss:            0,
                season_start_month:     8,
                season_start_day:       8,
                days_between_matchdays: 7,
            },
            match_engine: MatchConfig {
                base_goal_rate:     0.0145,
                strength_exponent:  1.6,
                max_goal_rate:      0.08,
                base_shot_rate:     0.12,
                on_target_ratio:    0.36,
                base_corner_rate:   0.055,
                base_foul_rate:     0.12,
                yellow_per_foul:    0.14,
                red_per_foul:       0.008,
                home_advantage:     1.08,
                mentality: MentalityTable {
                    defensive: MentalityModifier { attack: 0.85, defense: 1.15 },
                    balanced:  MentalityModifier { attack: 1.0,  defense: 1.0 },
                    attacking: MentalityModifier { attack: 1.15, defense: 0.88 },
                },
                pressing: PressingTable {
                    low:    PressingModifier { shots: 0.94, possession: 0.95, fouls: 0.85 },
                    medium: PressingModifier { shots: 1.0,  possession: 1.0,  fouls: 1.0 },
                    high:   PressingModifier { shots: 1.08, possession: 1.06, fouls: 1.25 },
                },
                tempo: TempoTable {
                    slow:   TempoModifier { events: 0.9,  possession: 1.05 },
                    normal: TempoModifier { events: 1.0,  possession: 1.0 },
                    fast:   TempoModifier { events: 1.12, possession: 0.96 },
                },
                substitution_from:  60,
                substitution_until: 85,
                substitution_rate:  0.12,
                max_substitutions:  3,
                bench_size:         7,
            },
            transfers: TransferConfig {
                offer_expiry_matchdays: 3,
                incoming_offer_chance:  0.15,
                bid_fee_min_ratio:      0.8,
                bid_fee_max_ratio:      1.4,
                accept_ratio:           1.2,
                reject_ratio:           0.8,
                min_squad_after_sale:   16,
            },
            scouting: ScoutingConfig {
                technical_weight:          0.4,
                physical_weight:           0.3,
                mental_weight:             0.3,
                youth_age:                 21,
                youth_bonus:               4.0,
                veteran_age:               31,
                veteran_penalty:           6.0,
                highly_recommended_margin: 8.0,
                recommended_margin:        -4.0,
                max_delay:                 10,
            },
            finance: FinanceConfig {
                gate_receipts_per_reputation: 12_000,
                wage_weeks_per_matchday:      1,
            },
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(data_dir: &str, file: &str) -> anyhow::Result<T> {
    let path = format!("{data_dir}/{file}");
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}
