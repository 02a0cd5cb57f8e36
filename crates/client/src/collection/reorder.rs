//! Перемещение одного элемента в упорядоченном списке
//!
//! Элемент вынимается со своей позиции и вставляется на позицию цели,
//! какой она была до удаления (перенос, а не обмен местами):
//! `[A,B,C]`: C на A -> `[C,A,B]`, A на B -> `[B,A,C]`.

/// Новый порядок после переноса `moved` на место `target`
///
/// `None`, если перенос ничего не меняет: одинаковые ID или ID нет в списке.
pub fn move_item<T: PartialEq + Clone>(items: &[T], moved: &T, target: &T) -> Option<Vec<T>> {
    if moved == target {
        return None;
    }
    let from = items.iter().position(|item| item == moved)?;
    let to = items.iter().position(|item| item == target)?;

    let mut reordered = items.to_vec();
    let item = reordered.remove(from);
    reordered.insert(to, item);
    Some(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_up_lands_before_target() {
        let items = ["A", "B", "C"];
        assert_eq!(move_item(&items, &"C", &"A"), Some(vec!["C", "A", "B"]));
        assert_eq!(move_item(&items, &"C", &"B"), Some(vec!["A", "C", "B"]));
    }

    #[test]
    fn test_drag_down_takes_target_slot() {
        let items = ["A", "B", "C"];
        assert_eq!(move_item(&items, &"A", &"B"), Some(vec!["B", "A", "C"]));
        assert_eq!(move_item(&items, &"A", &"C"), Some(vec!["B", "C", "A"]));
    }

    #[test]
    fn test_noop_cases() {
        let items = ["A", "B", "C"];
        assert_eq!(move_item(&items, &"B", &"B"), None);
        assert_eq!(move_item(&items, &"X", &"A"), None);
        assert_eq!(move_item(&items, &"A", &"X"), None);
    }

    #[test]
    fn test_other_elements_keep_relative_order() {
        let items = ["A", "B", "C", "D", "E", "F"];
        for moved in items {
            for target in items {
                if let Some(result) = move_item(&items, &moved, &target) {
                    let rest: Vec<&str> = result.iter().copied().filter(|x| *x != moved).collect();
                    let expected: Vec<&str> =
                        items.iter().copied().filter(|x| *x != moved).collect();
                    assert_eq!(rest, expected);

                    let at = result.iter().position(|x| *x == moved).unwrap();
                    let target_at = result.iter().position(|x| *x == target).unwrap();
                    assert_eq!(at.abs_diff(target_at), 1);
                }
            }
        }
    }
}
