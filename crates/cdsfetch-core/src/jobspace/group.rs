//! Year grouping: contiguous chunks of a fixed size, remainder in the last group.

use super::JobSpaceError;

/// Partitions `years` into contiguous groups of `group_size`, in original order.
///
/// The final group holds the remainder when the year count does not divide
/// evenly; that is intentional, not an error. `group_size == 0` is rejected.
pub fn group_years<T: Clone>(years: &[T], group_size: usize) -> Result<Vec<Vec<T>>, JobSpaceError> {
    if group_size == 0 {
        return Err(JobSpaceError::InvalidGroupSize);
    }
    Ok(years.chunks(group_size).map(<[T]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_groups() {
        let groups = group_years(&[2000, 2001, 2002], 1).unwrap();
        assert_eq!(groups, vec![vec![2000], vec![2001], vec![2002]]);
    }

    #[test]
    fn even_split() {
        let groups = group_years(&[2000, 2001, 2002, 2003], 2).unwrap();
        assert_eq!(groups, vec![vec![2000, 2001], vec![2002, 2003]]);
    }

    #[test]
    fn remainder_goes_to_last_group() {
        let groups = group_years(&[2000, 2001, 2002, 2003, 2004], 2).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2], vec![2004]);
    }

    #[test]
    fn group_larger_than_input() {
        let groups = group_years(&[2000, 2001], 10).unwrap();
        assert_eq!(groups, vec![vec![2000, 2001]]);
    }

    #[test]
    fn empty_years_give_no_groups() {
        let groups = group_years::<i32>(&[], 3).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn zero_group_size_rejected() {
        assert_eq!(
            group_years(&[2000], 0).unwrap_err(),
            JobSpaceError::InvalidGroupSize
        );
    }

    #[test]
    fn groups_cover_all_years_exactly_once() {
        let years: Vec<i32> = (1979..2024).collect();
        for group_size in 1..=7 {
            let groups = group_years(&years, group_size).unwrap();
            let total: usize = groups.iter().map(Vec::len).sum();
            assert_eq!(total, years.len());
            for group in &groups[..groups.len() - 1] {
                assert_eq!(group.len(), group_size);
            }
            let flat: Vec<i32> = groups.into_iter().flatten().collect();
            assert_eq!(flat, years);
        }
    }
}
