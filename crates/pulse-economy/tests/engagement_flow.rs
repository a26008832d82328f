//! End-to-end engagement flow: admission, session gating, player creation
//! with cohort assignment, referral completion, and leaderboard refresh.

use std::collections::HashMap;

use pulse_core::prelude::*;
use pulse_economy::{GenerationCohortAssigner, LeaderboardScorer, ReferralRewardPropagator};
use pulse_gating::{RequestGovernor, SessionScheduler};
use rand::rngs::StdRng;
use rand::SeedableRng;

struct Platform {
    governor: RequestGovernor,
    scheduler: SessionScheduler,
    cohorts: GenerationCohortAssigner,
    referrals: ReferralRewardPropagator,
    scorer: LeaderboardScorer,
    players: HashMap<PlayerId, Player>,
    rng: StdRng,
}

impl Platform {
    fn new() -> Self {
        Self {
            governor: RequestGovernor::new(GovernorConfig::default()).unwrap(),
            scheduler: SessionScheduler::new(SessionConfig::default()).unwrap(),
            cohorts: GenerationCohortAssigner::new(CohortConfig::default(), 0).unwrap(),
            referrals: ReferralRewardPropagator::new(ReferralConfig::default()).unwrap(),
            scorer: LeaderboardScorer::new(ScoreWeights::default()).unwrap(),
            players: HashMap::new(),
            rng: StdRng::seed_from_u64(42),
        }
    }

    /// The identity-onboarding path: cohort assignment exactly once,
    /// referral registration, optional parent link.
    fn create_player(&mut self, id: u64, referred_by: Option<PlayerId>, now_ms: i64) -> PlayerId {
        let id = PlayerId(id);
        let assignment = self.cohorts.assign();
        let player = Player::new(
            id,
            ReferralCode::generate(&mut self.rng),
            referred_by,
            assignment.generation,
            assignment.bonus,
            now_ms,
        );
        self.referrals.register_player(id, player.generation_bonus);
        if let Some(parent) = referred_by {
            self.referrals.link(parent, id, now_ms).unwrap();
        }
        self.players.insert(id, player);
        id
    }
}

#[test]
fn admission_gates_before_any_mutation() {
    let platform = Platform::new();
    let key = "player-1:start_session";

    for i in 0..5 {
        assert!(platform.governor.admit(key, 1_000 + i).is_allowed());
    }
    let decision = platform.governor.admit(key, 1_006);
    assert!(!decision.is_allowed());
    assert!(decision.retry_after_secs() > 0);
}

#[test]
fn full_flow_referral_to_leaderboard() {
    let mut platform = Platform::new();
    let now = 1_700_000_000_000;

    // Founders chain: root refers mid, mid refers leaf
    let root = platform.create_player(1, None, now);
    let mid = platform.create_player(2, Some(root), now + 1);
    let leaf = platform.create_player(3, Some(mid), now + 2);

    // Action passes admission, then the session gate
    assert!(platform
        .governor
        .admit("player-3:complete_referral", now)
        .is_allowed());
    let leaf_player = platform.players.get(&leaf).unwrap();
    assert!(platform.scheduler.can_start(leaf_player, now + 10).allowed);

    // Referral completion pays the chain with Founders bonuses (0.4):
    // depth 0 -> floor(50*1.0*1.4) = 70, depth 1 -> floor(50*0.7*1.4) = 49
    let rewards = platform.referrals.on_referral_completed(leaf).unwrap();
    assert_eq!(rewards.len(), 2);
    assert_eq!(rewards[0].amount, 70);
    assert_eq!(rewards[1].amount, 49);

    // A replayed completion grants nothing
    assert!(platform.referrals.on_referral_completed(leaf).is_err());

    // Apply economic results to the owned player records
    for reward in &rewards {
        let player = platform.players.get_mut(&reward.player_id).unwrap();
        player.power_tokens += reward.amount;
    }
    platform.players.get_mut(&mid).unwrap().referrals_count += 1;

    // Leaderboard refresh: mid's referral lifts them over leaf and root
    let mut players: Vec<Player> = platform.players.values().cloned().collect();
    players.sort_by_key(|p| p.id);
    let entries = platform.scorer.rank(&players, &HashMap::new());

    assert_eq!(entries[0].player_id, mid);
    assert_eq!(entries[0].rank, 1);
    // Tie between root and leaf breaks by earliest join
    assert_eq!(entries[1].player_id, root);
    assert_eq!(entries[2].player_id, leaf);
}

#[test]
fn session_lifecycle_with_daily_reset() {
    let mut platform = Platform::new();
    let hour = 3_600_000;
    let id = platform.create_player(1, None, 0);

    // Play out the day: each session ends, then the cooldown blocks
    let mut now = 4 * hour;
    for _ in 0..3 {
        {
            let player = platform.players.get(&id).unwrap();
            assert!(platform.scheduler.can_start(player, now).allowed);
        }
        let player = platform.players.get_mut(&id).unwrap();
        platform.scheduler.record_session_end(player, now);

        let gate = platform.scheduler.can_start(player, now + hour);
        assert!(!gate.allowed);
        assert_eq!(gate.wait_secs, 7_200);

        now += 4 * hour;
    }

    // External daily tick
    let player = platform.players.get_mut(&id).unwrap();
    assert_eq!(player.sessions_today, 3);
    platform.scheduler.reset_daily(player);
    assert_eq!(player.sessions_today, 0);
}

#[test]
fn cohort_assignment_is_permanent_on_the_record() {
    let mut platform = Platform::new();
    let id = platform.create_player(1, None, 0);
    let player = platform.players.get(&id).unwrap();

    assert_eq!(player.generation, Generation::Founders);
    assert_eq!(player.generation_bonus, 0.40);
    assert_eq!(platform.cohorts.population(), 1);
}
