//! Integration tests for the reorder operations: in-list moves,
//! cross-list moves, dense renumbering, gap tolerance, and the
//! cross-workspace fence.

use boardkit::db::Database;
use boardkit::error::Error;
use boardkit::types::CardPatch;

fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

/// A board with a single empty list (the defaults are deleted so card
/// tests start from a clean scope). Returns (db, board_id, list_id).
fn setup_list() -> (Database, String, String) {
    let db = setup_db();
    let workspace = db.create_workspace("acme").unwrap();
    let board = db.create_board(&workspace.id, "Sprint", None, None).unwrap();
    for list in db.get_lists(&board.id, true).unwrap() {
        db.delete_list(&list.id).unwrap();
    }
    let list = db.create_list(&board.id, "Inbox").unwrap();
    (db, board.id, list.id)
}

fn card_titles(db: &Database, list_id: &str) -> Vec<String> {
    db.get_cards(list_id, false)
        .unwrap()
        .into_iter()
        .map(|card| card.title)
        .collect()
}

fn card_positions(db: &Database, list_id: &str) -> Vec<i64> {
    db.get_cards(list_id, false)
        .unwrap()
        .into_iter()
        .map(|card| card.position)
        .collect()
}

mod move_within_list_tests {
    use super::*;

    #[test]
    fn forward_move_matches_vec_splice() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();

        db.move_card(&cards[0].id, 2).unwrap();

        assert_eq!(card_titles(&db, &list_id), vec!["b", "c", "a", "d"]);
        assert_eq!(card_positions(&db, &list_id), vec![0, 1, 2, 3]);
    }

    #[test]
    fn backward_move_matches_vec_splice() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();

        db.move_card(&cards[3].id, 0).unwrap();

        assert_eq!(card_titles(&db, &list_id), vec!["d", "a", "b", "c"]);
        assert_eq!(card_positions(&db, &list_id), vec![0, 1, 2, 3]);
    }

    #[test]
    fn move_to_current_index_changes_nothing() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();
        let before = db.get_cards(&list_id, false).unwrap();

        db.move_card(&cards[1].id, 1).unwrap();

        let after = db.get_cards(&list_id, false).unwrap();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.id, a.id);
            assert_eq!(b.position, a.position);
            assert_eq!(b.updated_at, a.updated_at);
        }
    }

    #[test]
    fn out_of_range_index_clamps_to_end() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();

        db.move_card(&cards[0].id, 99).unwrap();

        assert_eq!(card_titles(&db, &list_id), vec!["b", "c", "a"]);
    }

    #[test]
    fn move_closes_gaps_left_by_deletion() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();
        db.delete_card(&cards[1].id).unwrap();

        // Gap at position 1 until the next reorder of the scope.
        assert_eq!(card_positions(&db, &list_id), vec![0, 2, 3]);

        db.move_card(&cards[3].id, 0).unwrap();

        assert_eq!(card_titles(&db, &list_id), vec!["d", "a", "c"]);
        assert_eq!(card_positions(&db, &list_id), vec![0, 1, 2]);
    }

    #[test]
    fn archived_sibling_is_skipped_and_keeps_stale_position() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();
        db.update_card(
            &cards[2].id,
            CardPatch {
                is_archived: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        db.move_card(&cards[3].id, 0).unwrap();

        assert_eq!(card_titles(&db, &list_id), vec!["d", "a", "b"]);
        assert_eq!(card_positions(&db, &list_id), vec![0, 1, 2]);
        let archived = db.get_card(&cards[2].id).unwrap().unwrap();
        assert_eq!(archived.position, 2);
    }

    #[test]
    fn move_rejects_unknown_card() {
        let (db, _, _) = setup_list();

        assert!(matches!(
            db.move_card("no-such-card", 0),
            Err(Error::CardNotFound(_))
        ));
    }

    #[test]
    fn positions_stay_unique_through_a_move_storm() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = (0..7)
            .map(|i| db.create_card(&list_id, &format!("card {i}")).unwrap())
            .collect();

        for (step, card) in cards.iter().enumerate() {
            db.move_card(&card.id, (step * 3) % 7).unwrap();
            let mut positions = card_positions(&db, &list_id);
            positions.dedup();
            assert_eq!(positions.len(), 7, "duplicate position after step {step}");
        }
    }
}

mod move_across_lists_tests {
    use super::*;

    #[test]
    fn transfer_renumbers_both_scopes_densely() {
        let (db, board_id, source_id) = setup_list();
        let dest = db.create_list(&board_id, "Doing").unwrap();
        let cards: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|t| db.create_card(&source_id, t).unwrap())
            .collect();
        for t in ["x", "y"] {
            db.create_card(&dest.id, t).unwrap();
        }

        db.move_card_to_list(&cards[0].id, &dest.id, 1).unwrap();

        assert_eq!(card_titles(&db, &source_id), vec!["b", "c"]);
        assert_eq!(card_positions(&db, &source_id), vec![0, 1]);
        assert_eq!(card_titles(&db, &dest.id), vec!["x", "a", "y"]);
        assert_eq!(card_positions(&db, &dest.id), vec![0, 1, 2]);
    }

    #[test]
    fn transfer_into_empty_list_places_at_zero() {
        let (db, board_id, source_id) = setup_list();
        let dest = db.create_list(&board_id, "Doing").unwrap();
        let card = db.create_card(&source_id, "solo").unwrap();

        db.move_card_to_list(&card.id, &dest.id, 5).unwrap();

        let moved = db.get_card(&card.id).unwrap().unwrap();
        assert_eq!(moved.list_id, dest.id);
        assert_eq!(moved.position, 0);
        assert!(db.get_cards(&source_id, false).unwrap().is_empty());
    }

    #[test]
    fn transfer_across_boards_syncs_denormalized_board_id() {
        let db = setup_db();
        let workspace = db.create_workspace("acme").unwrap();
        let board_a = db.create_board(&workspace.id, "A", None, None).unwrap();
        let board_b = db.create_board(&workspace.id, "B", None, None).unwrap();
        let source = db.get_lists(&board_a.id, false).unwrap()[0].clone();
        let dest = db.get_lists(&board_b.id, false).unwrap()[0].clone();
        let card = db.create_card(&source.id, "wanderer").unwrap();
        assert_eq!(card.board_id, board_a.id);

        db.move_card_to_list(&card.id, &dest.id, 0).unwrap();

        let moved = db.get_card(&card.id).unwrap().unwrap();
        assert_eq!(moved.list_id, dest.id);
        assert_eq!(moved.board_id, board_b.id);
    }

    #[test]
    fn transfer_to_other_workspace_is_rejected() {
        let db = setup_db();
        let home = db.create_workspace("home").unwrap();
        let away = db.create_workspace("away").unwrap();
        let home_board = db.create_board(&home.id, "H", None, None).unwrap();
        let away_board = db.create_board(&away.id, "A", None, None).unwrap();
        let home_list = db.get_lists(&home_board.id, false).unwrap()[0].clone();
        let away_list = db.get_lists(&away_board.id, false).unwrap()[0].clone();
        let card = db.create_card(&home_list.id, "stays put").unwrap();

        let result = db.move_card_to_list(&card.id, &away_list.id, 0);

        assert!(matches!(result, Err(Error::CrossWorkspaceMove { .. })));
        let unmoved = db.get_card(&card.id).unwrap().unwrap();
        assert_eq!(unmoved.list_id, home_list.id);
    }

    #[test]
    fn transfer_to_unknown_list_is_rejected() {
        let (db, _, list_id) = setup_list();
        let card = db.create_card(&list_id, "a").unwrap();

        assert!(matches!(
            db.move_card_to_list(&card.id, "no-such-list", 0),
            Err(Error::ListNotFound(_))
        ));
    }

    #[test]
    fn transfer_to_own_list_degrades_to_in_list_move() {
        let (db, _, list_id) = setup_list();
        let cards: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|t| db.create_card(&list_id, t).unwrap())
            .collect();

        db.move_card_to_list(&cards[2].id, &list_id, 0).unwrap();

        assert_eq!(card_titles(&db, &list_id), vec!["c", "a", "b"]);
    }
}

mod move_list_tests {
    use super::*;

    #[test]
    fn spec_scenario_move_delete_then_append() {
        let db = setup_db();
        let workspace = db.create_workspace("acme").unwrap();
        let board = db.create_board(&workspace.id, "Sprint", None, None).unwrap();
        // Default lists: [To Do@0, Doing@1, Done@2].
        let lists = db.get_lists(&board.id, false).unwrap();
        let (a, b, c) = (lists[0].clone(), lists[1].clone(), lists[2].clone());

        db.move_list(&a.id, 2).unwrap();
        let after_move: Vec<(String, i64)> = db
            .get_lists(&board.id, false)
            .unwrap()
            .into_iter()
            .map(|l| (l.id, l.position))
            .collect();
        assert_eq!(
            after_move,
            vec![(b.id.clone(), 0), (c.id.clone(), 1), (a.id.clone(), 2)]
        );

        // Deleting B leaves the gap at 0 until the next reorder.
        db.delete_list(&b.id).unwrap();
        let survivors: Vec<(String, i64)> = db
            .get_lists(&board.id, false)
            .unwrap()
            .into_iter()
            .map(|l| (l.id, l.position))
            .collect();
        assert_eq!(survivors, vec![(c.id.clone(), 1), (a.id.clone(), 2)]);

        // Append uses max+1, not the vacant slot.
        let d = db.create_list(&board.id, "D").unwrap();
        assert_eq!(d.position, 3);
    }

    #[test]
    fn list_move_renumbers_board_sequence() {
        let db = setup_db();
        let workspace = db.create_workspace("acme").unwrap();
        let board = db.create_board(&workspace.id, "Sprint", None, None).unwrap();
        let lists = db.get_lists(&board.id, false).unwrap();

        db.move_list(&lists[2].id, 0).unwrap();

        let names: Vec<String> = db
            .get_lists(&board.id, false)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Done", "To Do", "Doing"]);
        let positions: Vec<i64> = db
            .get_lists(&board.id, false)
            .unwrap()
            .into_iter()
            .map(|l| l.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn move_list_rejects_unknown_id() {
        let db = setup_db();

        assert!(matches!(
            db.move_list("no-such-list", 0),
            Err(Error::ListNotFound(_))
        ));
    }
}
