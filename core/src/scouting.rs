//! Scouting subsystem: timed reports on other clubs' players.
//!
//! A report commissioned at tick T with delay D is completed by the first
//! tick >= T + D. Completion is evaluated lazily whenever the tick moves;
//! there is no timer. The recommendation is computed once and never
//! revisited.
//!
//! Execution: after FinanceSubsystem, every tick kind.

use crate::{
    career::{format_money, Career},
    config::{CareerConfig, ScoutingConfig},
    domain::{MessageKind, Player, Priority, Recommendation, ScoutFindings, ScoutReport, ScoutStatus},
    error::{CareerError, CareerResult},
    event::CareerEvent,
    inbox::Draft,
    rng::{RngSlot, SimRng},
    subsystem::{CareerSubsystem, TickKind},
    types::{PlayerId, ReportId},
};

/// Open a report on `player_id`, due `delay` matchdays from now.
pub(crate) fn commission(
    career: &mut Career,
    player_id: PlayerId,
    delay: u32,
    config: &CareerConfig,
    events: &mut Vec<CareerEvent>,
) -> CareerResult<ReportId> {
    let max = config.scouting.max_delay;
    if delay == 0 || delay > max {
        return Err(CareerError::InvalidInput(format!("scouting delay must be 1..={max}, got {delay}")));
    }
    let player = career.player(player_id)?;
    if player.club_id == career.club_id {
        return Err(CareerError::InvalidInput(format!("player {player_id} already plays for you")));
    }
    if career
        .scout_reports
        .iter()
        .any(|r| r.player_id == player_id && r.status == ScoutStatus::Scouting)
    {
        return Err(CareerError::AlreadyScouting { player_id });
    }

    let id = career.ids.next_report;
    career.ids.next_report += 1;
    let tick = career.calendar.tick;
    let due_tick = tick + delay as u64;
    career.scout_reports.push(ScoutReport {
        id,
        player_id,
        status: ScoutStatus::Scouting,
        delay,
        commissioned_season: career.calendar.season,
        commissioned_matchday: career.calendar.matchday,
        completion_matchday: career.calendar.matchday + delay,
        commissioned_tick: tick,
        due_tick,
        recommendation: None,
        findings: None,
    });
    events.push(CareerEvent::ScoutCommissioned { report_id: id, player_id, due_tick });
    log::info!(
        "season={} md={} scouting: report {id} on player {player_id} due at tick {due_tick}",
        career.calendar.season, career.calendar.matchday,
    );
    Ok(id)
}

/// Weighted attribute score with an age adjustment, clamped to 1..=99.
pub fn scout_score(player: &Player, config: &ScoutingConfig) -> u8 {
    let a = &player.attributes;
    let mut score = a.technical as f64 * config.technical_weight
        + a.physical as f64 * config.physical_weight
        + a.mental as f64 * config.mental_weight;
    if player.age <= config.youth_age {
        score += config.youth_bonus;
    } else if player.age >= config.veteran_age {
        score -= config.veteran_penalty;
    }
    score.round().clamp(1.0, 99.0) as u8
}

/// Recommendation of a score measured against the manager's club reputation.
pub fn recommend(score: u8, club_reputation: u8, config: &ScoutingConfig) -> Recommendation {
    let margin = score as f64 - club_reputation as f64;
    if margin >= config.highly_recommended_margin {
        Recommendation::HighlyRecommended
    } else if margin >= config.recommended_margin {
        Recommendation::Recommended
    } else {
        Recommendation::NotRecommended
    }
}

pub struct ScoutingSubsystem;

impl CareerSubsystem for ScoutingSubsystem {
    fn name(&self) -> &'static str {
        "scouting"
    }

    fn slot(&self) -> RngSlot {
        RngSlot::Scouting
    }

    fn on_tick(
        &self,
        career: &mut Career,
        config: &CareerConfig,
        _kind:  TickKind,
        _rng:   &mut SimRng,
    ) -> CareerResult<Vec<CareerEvent>> {
        let tick = career.calendar.tick;
        let reputation = career.managed_club()?.reputation;
        let due: Vec<usize> = career
            .scout_reports
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status == ScoutStatus::Scouting && r.due_tick <= tick)
            .map(|(i, _)| i)
            .collect();

        let mut events = Vec::with_capacity(due.len());
        for idx in due {
            let player = career.player(career.scout_reports[idx].player_id)?;
            let score = scout_score(player, &config.scouting);
            let recommendation = recommend(score, reputation, &config.scouting);
            let findings = ScoutFindings {
                rating: player.rating().round().clamp(0.0, 99.0) as u8,
                age: player.age,
                value: player.value,
                club_id: player.club_id,
                score,
            };
            let club_name = career.club(player.club_id)?.name.clone();
            let subject = format!("Scout report: {}", player.name);
            let body = format!(
                "{} ({}, {}) at {club_name}: rating {}, valued at {}. Verdict: {}.",
                player.name,
                player.position.code(),
                player.age,
                findings.rating,
                format_money(player.value),
                verdict(recommendation),
            );

            let report = &mut career.scout_reports[idx];
            report.status = ScoutStatus::Completed;
            report.recommendation = Some(recommendation);
            report.findings = Some(findings);
            let report_id = report.id;

            career.post(Draft::new(MessageKind::Staff, Priority::Normal, "Chief Scout", subject).body(body));
            events.push(CareerEvent::ScoutCompleted { report_id, recommendation });
            log::info!(
                "season={} md={} scouting: report {report_id} completed ({recommendation:?})",
                career.calendar.season, career.calendar.matchday,
            );
        }
        Ok(events)
    }
}

fn verdict(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::HighlyRecommended => "highly recommended",
        Recommendation::Recommended => "recommended",
        Recommendation::NotRecommended => "not recommended",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerAttributes, Position};

    fn player(attr: u8, age: u8) -> Player {
        Player {
            id: 1,
            name: "Test".into(),
            position: Position::Midfielder,
            age,
            attributes: PlayerAttributes::uniform(attr),
            value: 1_000_000,
            wage: 2_500,
            club_id: 2,
            suspended_matchdays: 0,
            season: Default::default(),
            career: Default::default(),
        }
    }

    #[test]
    fn age_shifts_the_score() {
        let config = CareerConfig::default().scouting;
        let prime = scout_score(&player(70, 26), &config);
        assert!(scout_score(&player(70, 19), &config) > prime);
        assert!(scout_score(&player(70, 33), &config) < prime);
    }

    #[test]
    fn recommendation_is_relative_to_club_reputation() {
        let config = CareerConfig::default().scouting;
        assert_eq!(recommend(80, 60, &config), Recommendation::HighlyRecommended);
        assert_eq!(recommend(60, 60, &config), Recommendation::Recommended);
        assert_eq!(recommend(40, 60, &config), Recommendation::NotRecommended);
    }
}
