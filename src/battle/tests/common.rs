use crate::battle::action_queue;
use crate::battle::engine::EngineContext;
use crate::battle::report::{ActionReport, MoveReport, TurnReport};
use crate::battle::state::{
    Battle, BattleAction, BattleMode, BattleSession, PokemonBattleInfo, TrainerBattleInfo,
};
use crate::battle::turn_orchestrator::resolve_turn;
use crate::catalog::{Catalog, InMemoryCatalog};
use crate::config::EngineConfig;
use crate::errors::BattleResult;
use crate::pokemon::Pokemon;
use crate::rng::{BattleRng, ScriptedRng};
use crate::trainer::{CombatantKind, Trainer};
use crate::type_chart::TypeChart;
use schema::{
    Ailment, BaseStats, CreatureTemplate, DamageClass, GrowthRate, LevelMove, MoveData, MoveId,
    MoveTarget, PokemonType, SpeciesId, StageStat, StatChange,
};

/// Move ids of the fixture catalog.
pub mod moves {
    use schema::MoveId;

    pub const DOUBLE_SLAP: MoveId = 3;
    pub const SWORDS_DANCE: MoveId = 14;
    pub const TACKLE: MoveId = 33;
    pub const DOUBLE_EDGE: MoveId = 38;
    pub const BITE: MoveId = 44;
    pub const GROWL: MoveId = 45;
    pub const EMBER: MoveId = 52;
    pub const ABSORB: MoveId = 71;
    pub const THUNDER_SHOCK: MoveId = 84;
    pub const THUNDER_WAVE: MoveId = 86;
    pub const QUICK_ATTACK: MoveId = 98;
    pub const RECOVER: MoveId = 105;
    pub const CONFUSE_RAY: MoveId = 109;
    pub const SWIFT: MoveId = 129;
    pub const SLASH: MoveId = 163;
}

/// Species ids of the fixture catalog.
pub mod species {
    use schema::SpeciesId;

    pub const BULBASAUR: SpeciesId = 1;
    pub const CHARMANDER: SpeciesId = 4;
    pub const PIDGEY: SpeciesId = 16;
    pub const PIKACHU: SpeciesId = 25;
    pub const GEODUDE: SpeciesId = 74;
    pub const GASTLY: SpeciesId = 92;
}

fn attack(
    id: MoveId,
    name: &str,
    move_type: PokemonType,
    power: u16,
    accuracy: u8,
    damage_class: DamageClass,
) -> MoveData {
    MoveData {
        id,
        name: name.to_string(),
        move_type,
        power,
        accuracy,
        priority: 0,
        damage_class,
        target: MoveTarget::Opponent,
        ailment: None,
        ailment_chance: 0,
        flinch_chance: 0,
        stat_changes: Vec::new(),
        stat_chance: 0,
        min_hits: None,
        max_hits: None,
        drain: 0,
        healing: 0,
        crit_rate: 0,
    }
}

fn status(id: MoveId, name: &str, move_type: PokemonType, accuracy: u8, target: MoveTarget) -> MoveData {
    MoveData {
        target,
        ..attack(id, name, move_type, 0, accuracy, DamageClass::Status)
    }
}

fn test_moves() -> Vec<MoveData> {
    use moves::*;
    use PokemonType::*;

    vec![
        attack(TACKLE, "tackle", Normal, 40, 100, DamageClass::Physical),
        MoveData {
            ailment: Some(Ailment::Paralysis),
            ailment_chance: 10,
            ..attack(THUNDER_SHOCK, "thunder-shock", Electric, 40, 100, DamageClass::Special)
        },
        MoveData {
            priority: 1,
            ..attack(QUICK_ATTACK, "quick-attack", Normal, 40, 100, DamageClass::Physical)
        },
        attack(SWIFT, "swift", Normal, 60, 0, DamageClass::Special),
        MoveData {
            ailment: Some(Ailment::Paralysis),
            ..status(THUNDER_WAVE, "thunder-wave", Electric, 90, MoveTarget::Opponent)
        },
        MoveData {
            stat_changes: vec![StatChange {
                stat: StageStat::Attack,
                change: -1,
            }],
            ..status(GROWL, "growl", Normal, 100, MoveTarget::Opponent)
        },
        MoveData {
            stat_changes: vec![StatChange {
                stat: StageStat::Attack,
                change: 2,
            }],
            ..status(SWORDS_DANCE, "swords-dance", Normal, 0, MoveTarget::User)
        },
        MoveData {
            min_hits: Some(2),
            max_hits: Some(5),
            ..attack(DOUBLE_SLAP, "double-slap", Normal, 15, 85, DamageClass::Physical)
        },
        MoveData {
            drain: 50,
            ..attack(ABSORB, "absorb", Grass, 20, 100, DamageClass::Special)
        },
        MoveData {
            healing: 50,
            ..status(RECOVER, "recover", Normal, 0, MoveTarget::User)
        },
        MoveData {
            ailment: Some(Ailment::Burn),
            ailment_chance: 10,
            ..attack(EMBER, "ember", Fire, 40, 100, DamageClass::Special)
        },
        MoveData {
            ailment: Some(Ailment::Confusion),
            ..status(CONFUSE_RAY, "confuse-ray", Ghost, 100, MoveTarget::Opponent)
        },
        MoveData {
            flinch_chance: 30,
            ..attack(BITE, "bite", Dark, 60, 100, DamageClass::Physical)
        },
        MoveData {
            drain: -33,
            ..attack(DOUBLE_EDGE, "double-edge", Normal, 120, 100, DamageClass::Physical)
        },
        MoveData {
            crit_rate: 1,
            ..attack(SLASH, "slash", Normal, 70, 100, DamageClass::Physical)
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn creature(
    id: SpeciesId,
    name: &str,
    types: Vec<PokemonType>,
    stats: [u8; 6],
    catch_rate: u8,
    base_exp: u16,
    growth_rate: GrowthRate,
    learnset: &[(u8, MoveId)],
) -> CreatureTemplate {
    let [hp, attack, defense, sp_attack, sp_defense, speed] = stats;
    CreatureTemplate {
        id,
        name: name.to_string(),
        types,
        base_stats: BaseStats {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        },
        catch_rate,
        base_exp,
        growth_rate,
        learnset: learnset
            .iter()
            .map(|&(level, move_id)| LevelMove { level, move_id })
            .collect(),
    }
}

fn test_creatures() -> Vec<CreatureTemplate> {
    use moves::*;
    use species::*;
    use PokemonType::*;

    vec![
        creature(
            PIKACHU,
            "pikachu",
            vec![Electric],
            [35, 55, 40, 50, 50, 90],
            190,
            112,
            GrowthRate::MediumFast,
            &[(1, THUNDER_SHOCK), (1, GROWL), (8, THUNDER_WAVE), (11, QUICK_ATTACK), (15, DOUBLE_SLAP), (20, SWIFT)],
        ),
        creature(
            CHARMANDER,
            "charmander",
            vec![Fire],
            [39, 52, 43, 60, 50, 65],
            45,
            62,
            GrowthRate::MediumSlow,
            &[(1, TACKLE), (1, GROWL), (7, EMBER), (13, BITE)],
        ),
        creature(
            BULBASAUR,
            "bulbasaur",
            vec![Grass, Poison],
            [45, 49, 49, 65, 65, 45],
            45,
            64,
            GrowthRate::MediumSlow,
            &[(1, TACKLE), (3, GROWL), (9, ABSORB)],
        ),
        creature(
            GASTLY,
            "gastly",
            vec![Ghost, Poison],
            [30, 35, 30, 100, 35, 80],
            190,
            62,
            GrowthRate::MediumSlow,
            &[(1, CONFUSE_RAY), (8, BITE)],
        ),
        creature(
            PIDGEY,
            "pidgey",
            vec![Normal, Flying],
            [40, 45, 40, 35, 35, 56],
            255,
            50,
            GrowthRate::MediumSlow,
            &[(1, TACKLE), (5, GROWL), (9, QUICK_ATTACK)],
        ),
        creature(
            GEODUDE,
            "geodude",
            vec![Rock, Ground],
            [40, 80, 100, 30, 30, 20],
            255,
            60,
            GrowthRate::MediumSlow,
            &[(1, TACKLE), (6, DOUBLE_EDGE)],
        ),
    ]
}

pub fn test_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    for move_data in test_moves() {
        catalog.insert_move(move_data);
    }
    for creature in test_creatures() {
        catalog.insert_creature(creature);
    }
    catalog
}

/// Owns the read-only collaborators a turn needs.
pub struct TestWorld {
    pub catalog: InMemoryCatalog,
    pub types: TypeChart,
    pub config: EngineConfig,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            catalog: test_catalog(),
            types: TypeChart::standard(),
            config,
        }
    }

    pub fn ctx(&self) -> EngineContext<'_> {
        EngineContext::new(&self.catalog, &self.types, &self.config)
    }

    pub fn move_data(&self, id: MoveId) -> MoveData {
        assert_ok(self.catalog.fetch_move(id).map_err(Into::into))
    }
}

/// A creature plus the battle state it should enter the session with.
#[derive(Debug, Clone)]
pub struct TestPokemon {
    pub pokemon: Pokemon,
    pub hp: Option<u16>,
    pub ailment: Option<Ailment>,
    pub confused: bool,
}

/// A builder for creating test creatures with common defaults: zero IVs,
/// learnset moves for the level, full HP and no ailment.
///
/// # Example
/// ```ignore
/// let pikachu = TestPokemonBuilder::new(species::PIKACHU, 25)
///     .with_moves(vec![moves::TACKLE])
///     .with_ailment(Ailment::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: SpeciesId,
    level: u8,
    moves: Option<Vec<MoveId>>,
    hp: Option<u16>,
    ailment: Option<Ailment>,
    confused: bool,
}

impl TestPokemonBuilder {
    pub fn new(species: SpeciesId, level: u8) -> Self {
        Self {
            species,
            level,
            moves: None,
            hp: None,
            ailment: None,
            confused: false,
        }
    }

    pub fn with_moves(mut self, moves: Vec<MoveId>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_ailment(mut self, ailment: Ailment) -> Self {
        self.ailment = Some(ailment);
        self
    }

    pub fn confused(mut self) -> Self {
        self.confused = true;
        self
    }

    pub fn build(self) -> TestPokemon {
        let template = match test_catalog().fetch_creature(self.species) {
            Ok(template) => template,
            Err(err) => panic!("Failed to load species {}: {}", self.species, err),
        };
        // ids are assigned when the session is built
        let mut pokemon = Pokemon::from_template(0, &template, self.level, [0; 6], 4);
        if let Some(moves) = self.moves {
            pokemon.moves = moves;
        }
        TestPokemon {
            pokemon,
            hp: self.hp,
            ailment: self.ailment,
            confused: self.confused,
        }
    }
}

/// Trainer ids of the two sides in every test session.
pub const CHALLENGER: u64 = 1;
pub const OPPONENT: u64 = 2;

/// Builds a started session. Side 0 creatures get ids 1, 2, ...; side 1
/// creatures get 101, 102, ...
pub fn create_session(
    kinds: [CombatantKind; 2],
    parties: [Vec<TestPokemon>; 2],
) -> BattleSession {
    let mut battle = Battle::new(CHALLENGER, OPPONENT);
    battle.mode = BattleMode::Started;

    let ids = [CHALLENGER, OPPONENT];
    let mut pokemon_info = Vec::new();
    let trainers = [0, 1].map(|side| {
        let mut party = Vec::new();
        for (index, entry) in parties[side].iter().enumerate() {
            let mut pokemon = entry.pokemon.clone();
            pokemon.id = side as u64 * 100 + index as u64 + 1;
            if entry.hp.is_some() || entry.ailment.is_some() || entry.confused {
                let mut info = PokemonBattleInfo::fresh(pokemon.max_hp());
                if let Some(hp) = entry.hp {
                    info.curr_hp = hp.min(pokemon.max_hp());
                }
                info.ailment = entry.ailment;
                info.confused = entry.confused;
                pokemon_info.push((pokemon.id, info));
            }
            party.push(pokemon);
        }
        let mut trainer = Trainer::new(ids[side], format!("trainer-{}", ids[side]), kinds[side])
            .with_party(party);
        trainer.battling = true;
        trainer
    });

    let mut session = BattleSession::new(battle, trainers, [TrainerBattleInfo::default(); 2]);
    session.pokemon_info.extend(pokemon_info);
    session
}

/// Two human trainers, one creature each.
pub fn create_test_session(p1: TestPokemon, p2: TestPokemon) -> BattleSession {
    create_session([CombatantKind::Human, CombatantKind::Human], [vec![p1], vec![p2]])
}

/// A human trainer against a wild creature.
pub fn create_wild_session(party: Vec<TestPokemon>, wild: TestPokemon) -> BattleSession {
    create_session([CombatantKind::Human, CombatantKind::Wild], [party, vec![wild]])
}

/// Queues both actions and resolves the turn with side 0 as initiator.
pub fn run_turn(
    session: &mut BattleSession,
    world: &TestWorld,
    actions: [BattleAction; 2],
    rng: &mut dyn BattleRng,
) -> TurnReport {
    let ctx = world.ctx();
    assert_ok(action_queue::submit(session, 1, actions[1], &ctx));
    assert_ok(action_queue::submit(session, 0, actions[0], &ctx));
    assert_ok(resolve_turn(session, 0, &ctx, rng))
}

pub fn hp(session: &BattleSession, side: usize) -> u16 {
    assert_ok(session.active_info(side)).curr_hp
}

pub fn max_hp(session: &BattleSession, side: usize) -> u16 {
    assert_ok(session.active(side)).max_hp()
}

/// The move report of the action at `index`, panicking on anything else.
pub fn move_report(report: &TurnReport, index: usize) -> &MoveReport {
    match report.actions.get(index) {
        Some(ActionReport::Move(report)) => report,
        other => panic!("Expected a move report at {} but got {:?}", index, other),
    }
}

/// Draws that fail every gate and never crit.
pub fn predictable_rng() -> ScriptedRng {
    ScriptedRng::new_for_test(vec![99; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
