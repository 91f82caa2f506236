/// Indexes of the largest and second-largest entries of `areas`.
///
/// Seeds from the first two entries, where entry 0 only leads when it is
/// strictly larger, then scans the rest. A later entry has to be strictly
/// larger to displace a current pick, so ties favour the earlier pick.
pub fn select_biggest(areas: &[f64]) -> Option<(usize, usize)> {
    if areas.len() < 2 {
        return None;
    }

    let (mut first, mut second) = if areas[0] > areas[1] { (0, 1) } else { (1, 0) };
    let mut first_area = areas[first];
    let mut second_area = areas[second];

    for (i, &area) in areas.iter().enumerate().skip(2) {
        if area > first_area {
            second = first;
            second_area = first_area;
            first = i;
            first_area = area;
        } else if area > second_area {
            second = i;
            second_area = area;
        }
    }

    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_two_entries() {
        assert_eq!(select_biggest(&[]), None);
        assert_eq!(select_biggest(&[5.0]), None);
    }

    #[test]
    fn test_two_entries() {
        assert_eq!(select_biggest(&[3.0, 1.0]), Some((0, 1)));
        assert_eq!(select_biggest(&[1.0, 3.0]), Some((1, 0)));
    }

    #[test]
    fn test_equal_seeds_lead_with_second() {
        assert_eq!(select_biggest(&[2.0, 2.0]), Some((1, 0)));
    }

    #[test]
    fn test_new_maximum_demotes_previous_first() {
        assert_eq!(select_biggest(&[10.0, 5.0, 20.0]), Some((2, 0)));
    }

    #[test]
    fn test_runner_up_replaced() {
        assert_eq!(select_biggest(&[10.0, 5.0, 7.0, 1.0]), Some((0, 2)));
    }

    #[test]
    fn test_ties_keep_earlier_pick() {
        assert_eq!(select_biggest(&[10.0, 8.0, 8.0, 10.0]), Some((0, 3)));
        assert_eq!(select_biggest(&[10.0, 8.0, 8.0]), Some((0, 1)));
    }

    #[test]
    fn test_unsorted_input() {
        let areas = [3.0, 9.0, 1.0, 12.0, 4.0, 11.0];
        assert_eq!(select_biggest(&areas), Some((3, 5)));
    }
}
