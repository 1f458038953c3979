#[cfg(test)]
mod tests {
    use crate::battle::engine::execute_move;
    use crate::battle::report::{ActionReport, MoveReport};
    use crate::battle::state::BattleSession;
    use crate::battle::tests::common::{
        create_test_session, hp, max_hp, moves, species, TestPokemonBuilder, TestWorld,
    };
    use crate::rng::ScriptedRng;
    use pretty_assertions::assert_eq;
    use schema::MoveId;

    fn use_move(session: &mut BattleSession, move_id: MoveId, draws: Vec<u32>) -> MoveReport {
        let world = TestWorld::new();
        let mut rng = ScriptedRng::new_for_test(draws);
        let report = match execute_move(session, 0, move_id, &world.ctx(), &mut rng) {
            Ok(ActionReport::Move(report)) => report,
            other => panic!("Expected a move report but got {:?}", other),
        };
        assert_eq!(rng.remaining(), 0);
        report
    }

    #[test]
    fn test_recover_heals_half_and_caps_at_max() {
        // Arrange
        let pikachu = TestPokemonBuilder::new(species::PIKACHU, 10)
            .with_moves(vec![moves::RECOVER])
            .with_hp(10)
            .build();
        let charmander = TestPokemonBuilder::new(species::CHARMANDER, 10).build();
        let mut session = create_test_session(pikachu, charmander);
        assert_eq!(max_hp(&session, 0), 27);

        // Act & Assert: 50% of 27 is 13
        let report = use_move(&mut session, moves::RECOVER, vec![]);
        assert_eq!(report.healed, 13);
        assert_eq!(report.attacker_hp_delta, 13);
        assert_eq!(hp(&session, 0), 23);

        // Act & Assert: only 4 HP are missing
        let report = use_move(&mut session, moves::RECOVER, vec![]);
        assert_eq!(report.healed, 4);
        assert_eq!(hp(&session, 0), 27);
    }

    #[test]
    fn test_absorb_returns_half_the_damage() {
        let bulbasaur = TestPokemonBuilder::new(species::BULBASAUR, 10)
            .with_moves(vec![moves::ABSORB])
            .with_hp(5)
            .build();
        let charmander = TestPokemonBuilder::new(species::CHARMANDER, 30).build();
        let mut session = create_test_session(bulbasaur, charmander);

        let report = use_move(&mut session, moves::ABSORB, vec![99]);

        let dealt = report.total_damage();
        assert!(dealt > 0);
        let expected = (dealt * 50 / 100).max(1) as u16;
        assert_eq!(report.drained, expected);
        assert_eq!(hp(&session, 0), 5 + expected);
    }

    #[test]
    fn test_double_edge_recoil() {
        let geodude = TestPokemonBuilder::new(species::GEODUDE, 10)
            .with_moves(vec![moves::DOUBLE_EDGE])
            .build();
        let pidgey = TestPokemonBuilder::new(species::PIDGEY, 30).build();
        let mut session = create_test_session(geodude, pidgey);
        let start = hp(&session, 0);

        let report = use_move(&mut session, moves::DOUBLE_EDGE, vec![99]);

        let expected = (report.total_damage() * 33 / 100).max(1) as u16;
        assert_eq!(report.recoil, expected);
        assert_eq!(hp(&session, 0), start - expected);
        assert_eq!(report.attacker_hp_delta, -(expected as i32));
    }

    #[test]
    fn test_drain_only_returns_landed_damage() {
        let bulbasaur = TestPokemonBuilder::new(species::BULBASAUR, 10)
            .with_moves(vec![moves::ABSORB])
            .with_hp(5)
            .build();
        let gastly = TestPokemonBuilder::new(species::GASTLY, 10).build();
        let mut session = create_test_session(bulbasaur, gastly);
        // Grass into Ghost/Poison is resisted, not immune: one crit roll
        let report = use_move(&mut session, moves::ABSORB, vec![99]);

        assert!(report.total_damage() >= 1);
        assert!(report.drained >= 1);

        let pikachu = TestPokemonBuilder::new(species::PIKACHU, 10)
            .with_moves(vec![moves::ABSORB])
            .with_hp(5)
            .build();
        let fainted = TestPokemonBuilder::new(species::CHARMANDER, 10).with_hp(0).build();
        let mut session = create_test_session(pikachu, fainted);
        let report = use_move(&mut session, moves::ABSORB, vec![]);

        assert_eq!(report.drained, 0);
        assert_eq!(hp(&session, 0), 5);
    }
}
