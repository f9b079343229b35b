use std::cmp::Ordering;

fn dominates(p1: &[f64], p2: &[f64]) -> bool {
    let mut dominated = false;
    for (a, b) in p1.iter().zip(p2) {
        match a.total_cmp(b) {
            Ordering::Less => dominated = true,
            Ordering::Greater => return false,
            Ordering::Equal => (),
        }
    }
    dominated
}

/// Efficient non-dominated sort. Returns candidate indices grouped by front,
/// best front first.
pub fn ens_nondominated_sorting(pop: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let mut indices = (0..pop.len()).collect::<Vec<usize>>();
    indices.sort_by(|&a, &b| {
        pop[a]
            .iter()
            .zip(&pop[b])
            .map(|(x, y)| x.total_cmp(y))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    let mut fronts: Vec<Vec<usize>> = vec![];
    for &n in indices.iter() {
        let mut k = 0;
        while k < fronts.len() {
            let contain_dominating_n = fronts[k]
                .iter()
                .rev()
                .any(|i| dominates(&pop[*i], &pop[n]));

            if !contain_dominating_n
            {
                fronts[k].push(n);
                break;
            }

            k += 1;
        }

        if k == fronts.len()
        {
            fronts.push(vec![n]);
        }
    }

    fronts
}
