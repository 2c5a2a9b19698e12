//! Integration tests for roster loading and store lookups.

use cricket_scoring_admin::{
    default_roster, read_roster, CricketStore, Group, RosterError, Tournament,
};

#[test]
fn reads_teams_in_file_order() {
    let csv = "id,name,primary_color,group\n\
               a1, Alpha ,10 50% 50%,A\n\
               b1,Bravo,20 50% 50%,B\n\
               a2,Charlie,30 50% 50%,a\n";
    let teams = read_roster(csv.as_bytes()).unwrap();
    let ids: Vec<_> = teams.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["a1", "b1", "a2"]);
    assert_eq!(teams[0].name, "Alpha");
    assert_eq!(teams[2].group, Group::A);
}

#[test]
fn rejects_invalid_group() {
    let csv = "id,name,primary_color,group\nx,X,0 0% 0%,C\n";
    match read_roster(csv.as_bytes()) {
        Err(RosterError::InvalidGroup { team, value }) => {
            assert_eq!(team, "x");
            assert_eq!(value, "C");
        }
        other => panic!("expected invalid group, got {:?}", other),
    }
}

#[test]
fn rejects_duplicate_ids_and_blank_fields() {
    let dup = "id,name,primary_color,group\nx,X,,A\nx,Y,,B\n";
    assert!(matches!(
        read_roster(dup.as_bytes()),
        Err(RosterError::DuplicateTeam(id)) if id == "x"
    ));

    let blank = "id,name,primary_color,group\nx,X,,A\n,Y,,B\n";
    assert!(matches!(
        read_roster(blank.as_bytes()),
        Err(RosterError::BlankField { row: 2 })
    ));
}

#[test]
fn default_roster_splits_into_groups() {
    let store = Tournament::with_teams(default_roster().unwrap());
    let a = store.teams_by_group(Group::A);
    let b = store.teams_by_group(Group::B);
    assert!(!a.is_empty() && !b.is_empty());
    assert_eq!(a.len() + b.len(), store.teams().len());
    assert!(a.iter().all(|t| t.group == Group::A));
    assert_eq!(store.team(&a[0].id), Some(a[0].clone()));
    assert_eq!(store.team("no-such-team"), None);
}
