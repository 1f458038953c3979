//! Request-level entry points.
//!
//! Every public method is one unit of work: it opens a transaction, loads
//! what it needs, mutates, and commits. Any error drops the transaction so
//! nothing is persisted. Notifications go out only after a successful commit.

use crate::battle::action_queue;
use crate::battle::engine::EngineContext;
use crate::battle::outcome::{apply_outcome, forfeit};
use crate::battle::report::{BattleOutcome, TurnReport};
use crate::battle::state::{Battle, BattleAction, BattleMode, BattleSession, TrainerBattleInfo};
use crate::battle::turn_orchestrator::resolve_turn;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::errors::{invariant, ActionError, BattleResult, InvariantError, PreconditionError};
use crate::messaging::{Messenger, Notification};
use crate::pokemon::{Pokemon, PokemonId};
use crate::progression::{resolve_conflict, LevelingReport, MoveChoice};
use crate::rng::BattleRng;
use crate::storage::{RecordStore, Transaction};
use crate::trainer::{CombatantKind, Trainer, TrainerId};
use crate::type_chart::TypeChart;
use crate::wild::{pick_encounter, roll_ivs, spawn_wild, WildTables};
use schema::SpeciesId;

/// What a submission led to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored; the other side has not chosen yet.
    Queued,
    /// The submission completed the turn and it was resolved.
    Resolved(TurnReport),
}

pub struct BattleService<S, C, M> {
    store: S,
    catalog: C,
    types: TypeChart,
    config: EngineConfig,
    wild: WildTables,
    messenger: M,
}

impl<S: RecordStore, C: Catalog, M: Messenger> BattleService<S, C, M> {
    pub fn new(
        store: S,
        catalog: C,
        types: TypeChart,
        config: EngineConfig,
        wild: WildTables,
        messenger: M,
    ) -> Self {
        Self {
            store,
            catalog,
            types,
            config,
            wild,
            messenger,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn ctx(&self) -> EngineContext<'_> {
        EngineContext::new(&self.catalog, &self.types, &self.config)
    }

    fn notify(&self, notifications: Vec<Notification>) {
        for notification in &notifications {
            self.messenger.deliver(notification);
        }
    }

    /// Creates a trainer with a party built from `(species, level)` pairs.
    pub fn register_trainer(
        &self,
        name: &str,
        kind: CombatantKind,
        party: &[(SpeciesId, u8)],
        rng: &mut dyn BattleRng,
    ) -> BattleResult<Trainer> {
        let mut tx = Transaction::begin(&self.store);
        let id = tx.next_trainer_id()?;

        let mut members = Vec::with_capacity(party.len());
        for (species_id, level) in party.iter().take(self.config.party_size_limit) {
            let template = self.catalog.fetch_creature(*species_id)?;
            let pokemon_id = tx.next_pokemon_id()?;
            let level = (*level).clamp(1, self.config.max_level);
            members.push(Pokemon::from_template(
                pokemon_id,
                &template,
                level,
                roll_ivs(rng),
                self.config.move_slots,
            ));
        }

        let trainer = Trainer::new(id, name, kind).with_party(members);
        tx.save_trainer(&trainer)?;
        tx.commit()?;

        log::info!("registered trainer {} ({})", trainer.name, trainer.id);
        Ok(trainer)
    }

    pub fn trainer(&self, id: TrainerId) -> BattleResult<Trainer> {
        Transaction::begin(&self.store).load_trainer(id)
    }

    /// The battle `participant` is currently in, waiting or started.
    pub fn battle_of(&self, participant: TrainerId) -> BattleResult<Option<Battle>> {
        Transaction::begin(&self.store).load_battle(participant)
    }

    /// Opens a waiting battle between two free trainers.
    pub fn challenge(&self, challenger: TrainerId, opponent: TrainerId) -> BattleResult<Battle> {
        if challenger == opponent {
            return Err(PreconditionError::SelfChallenge.into());
        }

        let mut tx = Transaction::begin(&self.store);
        let mut trainers = [tx.load_trainer(challenger)?, tx.load_trainer(opponent)?];
        for trainer in &trainers {
            ensure_free(&tx, trainer)?;
        }

        let battle = Battle::new(challenger, opponent);
        for trainer in trainers.iter_mut() {
            trainer.battling = true;
            tx.save_trainer(trainer)?;
        }
        tx.save_battle(&battle)?;
        tx.commit()?;

        log::info!("battle {}: {} challenged {}", battle.id, challenger, opponent);
        self.notify(vec![Notification::ChallengeIssued {
            battle_id: battle.id.clone(),
            challenger,
            opponent,
        }]);
        Ok(battle)
    }

    /// The challenged trainer starts the battle.
    pub fn accept(&self, opponent: TrainerId) -> BattleResult<Battle> {
        let mut tx = Transaction::begin(&self.store);
        let mut battle = waiting_battle(&tx, opponent)?;
        if battle.mode == BattleMode::Started {
            return Err(PreconditionError::BattleAlreadyStarted.into());
        }
        if battle.participants[1] != opponent {
            return Err(PreconditionError::NotChallenged.into());
        }

        battle.mode = BattleMode::Started;
        tx.save_battle(&battle)?;
        for participant in battle.participants {
            tx.save_trainer_battle_info(&battle.id, participant, &TrainerBattleInfo::default())?;
        }
        tx.commit()?;

        log::info!("battle {} started", battle.id);
        self.notify(vec![Notification::BattleStarted {
            battle_id: battle.id.clone(),
            participants: battle.participants,
        }]);
        Ok(battle)
    }

    /// Either participant may call off a battle that has not started.
    pub fn withdraw(&self, participant: TrainerId) -> BattleResult<()> {
        let mut tx = Transaction::begin(&self.store);
        let battle = waiting_battle(&tx, participant)?;
        if battle.mode == BattleMode::Started {
            return Err(PreconditionError::BattleAlreadyStarted.into());
        }

        for id in battle.participants {
            let mut trainer = tx.load_trainer(id)?;
            trainer.battling = false;
            tx.save_trainer(&trainer)?;
        }
        tx.delete_battle(&battle, &[]);
        tx.commit()?;

        log::info!("battle {} withdrawn by {}", battle.id, participant);
        self.notify(vec![Notification::ChallengeWithdrawn {
            battle_id: battle.id,
            by: participant,
        }]);
        Ok(())
    }

    /// Spawns a wild creature from `region` and starts a battle against it.
    pub fn start_wild_battle(
        &self,
        trainer_id: TrainerId,
        region: &str,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<Battle> {
        let mut tx = Transaction::begin(&self.store);
        let mut trainer = tx.load_trainer(trainer_id)?;
        ensure_free(&tx, &trainer)?;

        let (species_id, level) =
            pick_encounter(&self.wild, region, trainer.badges, &self.config, rng)?;
        let template = self.catalog.fetch_creature(species_id)?;
        let wild_id = tx.next_trainer_id()?;
        let pokemon_id = tx.next_pokemon_id()?;
        let creature = spawn_wild(pokemon_id, &template, level, &self.config, rng);

        let mut wild = Trainer::new(wild_id, template.name.clone(), CombatantKind::Wild)
            .with_party(vec![creature]);
        wild.battling = true;
        trainer.battling = true;

        let mut battle = Battle::new(trainer_id, wild_id);
        battle.mode = BattleMode::Started;
        tx.save_trainer(&trainer)?;
        tx.save_trainer(&wild)?;
        tx.save_battle(&battle)?;
        for participant in battle.participants {
            tx.save_trainer_battle_info(&battle.id, participant, &TrainerBattleInfo::default())?;
        }
        tx.commit()?;

        log::info!(
            "battle {}: {} met a wild {} at level {}",
            battle.id,
            trainer.name,
            template.name,
            level
        );
        self.notify(vec![Notification::BattleStarted {
            battle_id: battle.id.clone(),
            participants: battle.participants,
        }]);
        Ok(battle)
    }

    /// Queues `participant`'s action. If that completes the turn (AI sides
    /// fill in automatically), the whole turn resolves in this request.
    pub fn submit_action(
        &self,
        participant: TrainerId,
        action: BattleAction,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<SubmitOutcome> {
        let ctx = self.ctx();
        let mut tx = Transaction::begin(&self.store);
        let mut session = tx.load_session(participant)?;
        let side = session.side_of(participant)?;

        action_queue::submit(&mut session, side, action, &ctx)?;
        action_queue::auto_assign(&mut session, &ctx, rng)?;

        if !action_queue::is_ready(&session) {
            tx.save_session(&session)?;
            tx.commit()?;
            self.notify(vec![Notification::ActionQueued {
                battle_id: session.battle.id.clone(),
                participant,
            }]);
            return Ok(SubmitOutcome::Queued);
        }

        let report = resolve_turn(&mut session, side, &ctx, rng)?;
        match &report.outcome {
            Some(_) => conclude(&mut tx, &session)?,
            None => tx.save_session(&session)?,
        }
        tx.commit()?;

        let mut notifications = vec![Notification::TurnResolved(report.clone())];
        for leveling in &report.leveling {
            notifications.push(Notification::Leveling {
                trainer: participant_owning(&session, leveling.pokemon),
                report: leveling.clone(),
            });
        }
        if let Some(outcome) = &report.outcome {
            notifications.push(Notification::BattleEnded {
                battle_id: session.battle.id.clone(),
                outcome: outcome.clone(),
            });
        }
        self.notify(notifications);
        Ok(SubmitOutcome::Resolved(report))
    }

    /// Concedes a started battle.
    pub fn forfeit(&self, participant: TrainerId) -> BattleResult<BattleOutcome> {
        let mut tx = Transaction::begin(&self.store);
        let mut session = tx.load_session(participant)?;
        let side = session.side_of(participant)?;

        let outcome = forfeit(&session, side);
        apply_outcome(&mut session, &outcome);
        conclude(&mut tx, &session)?;
        tx.commit()?;

        self.notify(vec![Notification::BattleEnded {
            battle_id: session.battle.id.clone(),
            outcome: outcome.clone(),
        }]);
        Ok(outcome)
    }

    /// Answers a pending move-learn decision and continues leveling.
    pub fn resolve_move_conflict(
        &self,
        trainer_id: TrainerId,
        pokemon_id: PokemonId,
        choice: MoveChoice,
    ) -> BattleResult<LevelingReport> {
        let mut tx = Transaction::begin(&self.store);
        let mut trainer = tx.load_trainer(trainer_id)?;
        let Some(pokemon) = trainer.pokemon_mut(pokemon_id) else {
            return Err(ActionError::UnknownPokemon(pokemon_id).into());
        };
        if pokemon.pending_move.is_none() {
            return Err(ActionError::NoPendingDecision(pokemon_id).into());
        }

        let template = self.catalog.fetch_creature(pokemon.species_id)?;
        let old_max_hp = pokemon.max_hp();
        let report = resolve_conflict(pokemon, &template, choice, &self.config)?;
        let max_hp = pokemon.max_hp();
        tx.save_trainer(&trainer)?;

        // mid-battle, current HP rises with max HP as it does after a knockout
        let hp_gain = max_hp.saturating_sub(old_max_hp);
        if hp_gain > 0 {
            if let Some(battle) = tx.load_battle(trainer_id)? {
                if let Some(mut info) = tx.load_pokemon_battle_info(&battle.id, pokemon_id)? {
                    info.restore_hp(hp_gain, max_hp);
                    tx.save_pokemon_battle_info(&battle.id, pokemon_id, &info)?;
                }
            }
        }
        tx.commit()?;

        self.notify(vec![Notification::Leveling {
            trainer: trainer_id,
            report: report.clone(),
        }]);
        Ok(report)
    }
}

/// A trainer may only enter a battle when free and able to fight.
fn ensure_free<S: RecordStore + ?Sized>(
    tx: &Transaction<'_, S>,
    trainer: &Trainer,
) -> BattleResult<()> {
    if trainer.battling || tx.load_battle(trainer.id)?.is_some() {
        return Err(PreconditionError::AlreadyInBattle(trainer.id).into());
    }
    if trainer.party.is_empty() {
        return Err(PreconditionError::NoHealthyCreature(trainer.id).into());
    }
    Ok(())
}

/// The battle record of `participant`, whatever its mode.
fn waiting_battle<S: RecordStore + ?Sized>(
    tx: &Transaction<'_, S>,
    participant: TrainerId,
) -> BattleResult<Battle> {
    let trainer = tx.load_trainer(participant)?;
    match tx.load_battle(participant)? {
        Some(battle) => Ok(battle),
        None if trainer.battling => Err(invariant(InvariantError::BattlingWithoutBattle(
            participant,
        ))),
        None => Err(PreconditionError::NotInBattle(participant).into()),
    }
}

/// Writes the end of a battle: trainers persist with their counters, wild
/// trainers vanish, and the battle goes with all its child records.
fn conclude<S: RecordStore + ?Sized>(
    tx: &mut Transaction<'_, S>,
    session: &BattleSession,
) -> BattleResult<()> {
    for trainer in &session.trainers {
        if trainer.kind == CombatantKind::Wild {
            tx.delete_trainer(trainer.id);
        } else {
            tx.save_trainer(trainer)?;
        }
    }
    tx.delete_battle(&session.battle, &session.all_pokemon_ids());
    Ok(())
}

fn participant_owning(session: &BattleSession, pokemon: PokemonId) -> TrainerId {
    session
        .trainers
        .iter()
        .find(|trainer| trainer.pokemon(pokemon).is_some())
        .map_or(session.battle.participants[0], |trainer| trainer.id)
}
