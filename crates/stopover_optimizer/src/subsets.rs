use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubsetError {
    #[error("{count} optional stops exceed the cap of {cap} (2^{count} subsets to solve)")]
    CapacityExceeded { count: usize, cap: usize },
}

/// All 2^count subsets of `0..count`, as index lists into the optional-stop
/// list. Enumerated by increasing subset size, lexicographically within a
/// size, so ranks downstream are reproducible across runs. Each subset
/// preserves the original ordering of its members.
pub fn enumerate_subsets(count: usize, cap: usize) -> Result<Vec<Vec<usize>>, SubsetError> {
    if count > cap {
        return Err(SubsetError::CapacityExceeded { count, cap });
    }

    let mut subsets = Vec::with_capacity(1 << count);
    for size in 0..=count {
        combinations(count, size, &mut subsets);
    }

    Ok(subsets)
}

/// Appends every size-`size` combination of `0..count` in lexicographic
/// order.
fn combinations(count: usize, size: usize, out: &mut Vec<Vec<usize>>) {
    let mut current = Vec::with_capacity(size);
    combinations_from(0, count, size, &mut current, out);
}

fn combinations_from(
    first: usize,
    count: usize,
    size: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if current.len() == size {
        out.push(current.clone());
        return;
    }

    for index in first..count {
        current.push(index);
        combinations_from(index + 1, count, size, current, out);
        current.pop();
    }
}
