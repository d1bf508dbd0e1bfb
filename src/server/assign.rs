use crate::data_model::mentee::Mentee;
use crate::data_model::mentor::Mentor;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssignError {
    #[error("No mentor available")]
    NoMentorAvailable,
}

/// Picks the mentor with the fewest mentees from `(mentor id, mentee count)`
/// pairs. Equal counts go to the lowest id, so input order never matters.
pub fn select_mentor<I>(mentors: I) -> Result<u64, AssignError>
where
    I: IntoIterator<Item = (u64, u64)>,
{
    mentors
        .into_iter()
        .min_by_key(|&(id, count)| (count, id))
        .map(|(id, _)| id)
        .ok_or(AssignError::NoMentorAvailable)
}

/// Current load of every mentor, including idle ones. Mentees pointing at an
/// unknown mentor are not counted.
pub fn mentor_loads(mentors: &[Mentor], mentees: &[Mentee]) -> Vec<(u64, u64)> {
    let mut loads: BTreeMap<u64, u64> = mentors.iter().map(|m| (m.id, 0)).collect();
    for mentee in mentees {
        if let Some(cnt) = loads.get_mut(&mentee.mentor_id) {
            *cnt += 1;
        }
    }
    loads.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentor(id: u64) -> Mentor {
        let mut m = Mentor::new(&format!("mentor{}", id), "CS", "x@y", "hash");
        m.id = id;
        m
    }

    fn mentee(id: u64, mentor_id: u64) -> Mentee {
        let mut m = Mentee::new(&format!("mentee{}", id), mentor_id, "BSc", "x@y", "hash");
        m.id = id;
        m
    }

    #[test]
    fn picks_least_loaded() {
        assert_eq!(select_mentor(vec![(1, 3), (2, 1), (3, 1)]), Ok(2));
    }

    #[test]
    fn single_mentor() {
        assert_eq!(select_mentor(vec![(5, 0)]), Ok(5));
    }

    #[test]
    fn empty_pool_fails() {
        assert_eq!(
            select_mentor(Vec::<(u64, u64)>::new()),
            Err(AssignError::NoMentorAvailable)
        );
    }

    #[test]
    fn tie_break_ignores_input_order() {
        let forward = vec![(4, 2), (9, 2), (7, 5)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(select_mentor(forward.clone()), Ok(4));
        assert_eq!(select_mentor(backward), Ok(4));
        assert_eq!(select_mentor(forward), Ok(4));
    }

    #[test]
    fn result_is_minimal() {
        let pool = vec![(10, 7), (11, 3), (12, 9), (13, 4), (14, 3), (15, 8)];
        let picked = select_mentor(pool.clone()).unwrap();
        let picked_cnt = pool.iter().find(|(id, _)| *id == picked).unwrap().1;
        assert!(pool.iter().all(|&(_, cnt)| picked_cnt <= cnt));
        assert_eq!(picked, 11);
    }

    #[test]
    fn loads_include_idle_mentors() {
        let mentors = vec![mentor(1), mentor(2), mentor(3)];
        let mentees = vec![mentee(1, 1), mentee(2, 1), mentee(3, 3), mentee(4, 42)];
        assert_eq!(mentor_loads(&mentors, &mentees), vec![(1, 2), (2, 0), (3, 1)]);
        assert_eq!(select_mentor(mentor_loads(&mentors, &mentees)), Ok(2));
    }
}
