use portal_core::{update, update_table, ApplicationsTable, BoardState, Msg, TableMsg};

#[test]
fn unmounted_views_ignore_change_signals() {
    let board = BoardState::new();
    let (next, effects) = update(board.clone(), Msg::ApplicationsChanged);
    assert_eq!(board, next);
    assert!(effects.is_empty());

    let table = ApplicationsTable::new();
    let (next, effects) = update_table(table.clone(), TableMsg::ApplicationsChanged);
    assert_eq!(table, next);
    assert!(effects.is_empty());
}
