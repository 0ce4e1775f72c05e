use std::collections::{BTreeMap, VecDeque};

use core::num::{NonZeroU64, NonZeroUsize};

use ancestry_core::{
    demography::{Demography, PopulationSplit},
    rng::{RngCore, RngSampler},
    samples::Samples,
    tables::{NodeFlags, NodeId, PopulationId, TreeTables},
};
use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use crate::{
    arguments::AncestryArguments,
    lineage::{Lineage, Segment},
    overlap::OverlapCounts,
    HudsonError,
};

pub(crate) struct Simulation<'d, G: RngCore> {
    demography: &'d Demography,
    rng: G,

    tables: TreeTables,
    time: NonNegativeF64,
    recombination_rate: NonNegativeF64,

    populations: Vec<Vec<Lineage>>,
    overlaps: OverlapCounts,
    next_split: usize,

    edge_buffer: BTreeMap<NodeId, Vec<(u64, u64)>>,

    num_coalescences: u64,
    num_recombinations: u64,
}

impl<'d, G: RngCore> Simulation<'d, G> {
    pub fn new(
        demography: &'d Demography,
        samples: &Samples,
        arguments: &AncestryArguments,
        rng: G,
    ) -> Result<Self, HudsonError> {
        let length = arguments.sequence_length.get();

        // Positions must be exactly representable as integers
        if length.fract() > 0.0_f64 || length > 9_007_199_254_740_992.0_f64 {
            return Err(HudsonError::NonIntegerSequenceLength(
                arguments.sequence_length,
            ));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let sequence_length = length as u64;

        let num_nodes = samples.num_nodes();

        if num_nodes < 2 {
            return Err(HudsonError::TooFewSamples(num_nodes));
        }

        let mut tables = TreeTables::new(arguments.sequence_length);

        for population in demography.populations() {
            tables.add_population(population.name.as_str(), "")?;
        }

        let mut populations = vec![Vec::new(); demography.populations().len()];

        for set in samples.sets() {
            let lineages = populations
                .get_mut(set.population.index())
                .ok_or(HudsonError::UnknownPopulation(set.population))?;

            for _ in 0..set.num_individuals {
                let individual = tables.add_individual(0)?;

                for _ in 0..samples.ploidy().get() {
                    let node = tables.add_node(
                        NodeFlags::IS_SAMPLE,
                        NonNegativeF64::zero(),
                        Some(set.population),
                        Some(individual),
                    )?;

                    lineages.push(Lineage::new(Segment {
                        left: 0,
                        right: sequence_length,
                        node,
                    }));
                }
            }
        }

        Ok(Self {
            demography,
            rng,
            tables,
            time: NonNegativeF64::zero(),
            recombination_rate: arguments.recombination_rate,
            populations,
            overlaps: OverlapCounts::new(sequence_length, num_nodes),
            next_split: 0,
            edge_buffer: BTreeMap::new(),
            num_coalescences: 0,
            num_recombinations: 0,
        })
    }

    pub fn run(mut self) -> Result<TreeTables, HudsonError> {
        let demography = self.demography;

        loop {
            let num_lineages = self.num_lineages();

            if num_lineages == 0 {
                break;
            }

            let coalescence_rates = self.coalescence_rates();
            let total_links: u64 = self.lineages().map(Lineage::links).sum();

            #[allow(clippy::cast_precision_loss)]
            let recombination_rate = self.recombination_rate.get() * (total_links as f64);
            let total_rate = recombination_rate + coalescence_rates.iter().sum::<f64>();

            let waiting_time = PositiveF64::new(total_rate)
                .ok()
                .map(|total_rate| self.rng.sample_exponential(total_rate));

            match (waiting_time, demography.splits().get(self.next_split)) {
                (Some(waiting_time), Some(split)) if self.time + waiting_time >= split.time => {
                    self.apply_split(split);
                },
                (None, Some(split)) => self.apply_split(split),
                (None, None) => {
                    return Err(HudsonError::NoFurtherEvents {
                        time: self.time,
                        lineages: num_lineages,
                    })
                },
                (Some(waiting_time), _) => {
                    self.time = self.time + waiting_time;

                    let mut event = self.rng.sample_uniform_closed_open().get() * total_rate;

                    if event < recombination_rate {
                        if let Some(total_links) = NonZeroU64::new(total_links) {
                            self.recombine(total_links);
                        }

                        continue;
                    }

                    event -= recombination_rate;

                    // Rounding errors fall back to the last population
                    let population = coalescence_rates
                        .iter()
                        .position(|rate| {
                            let found = event < *rate;
                            event -= *rate;
                            found
                        })
                        .or_else(|| coalescence_rates.iter().rposition(|rate| *rate > 0.0_f64));

                    if let Some(population) = population {
                        self.coalesce(population)?;
                    }
                },
            }
        }

        info!(
            "Simulated ancestry until time {} with {} coalescence and {} recombination events.",
            self.time, self.num_coalescences, self.num_recombinations,
        );

        Ok(self.tables)
    }

    fn num_lineages(&self) -> usize {
        self.populations.iter().map(Vec::len).sum()
    }

    fn lineages(&self) -> impl Iterator<Item = &Lineage> {
        self.populations.iter().flatten()
    }

    /// Pairwise coalescence happens at rate `1 / (2 N)` per generation
    fn coalescence_rates(&self) -> Vec<f64> {
        self.populations
            .iter()
            .zip(self.demography.populations())
            .map(|(lineages, population)| {
                #[allow(clippy::cast_precision_loss)]
                let k = lineages.len() as f64;

                k * (k - 1.0_f64) * 0.5_f64 / (2.0_f64 * population.initial_size.get())
            })
            .collect()
    }

    fn apply_split(&mut self, split: &PopulationSplit) {
        self.time = self.time.max(split.time);
        self.next_split += 1;

        for derived in &split.derived {
            let lineages = std::mem::take(&mut self.populations[derived.index()]);

            debug!(
                "Moving {} lineages from population {} into {} at time {}.",
                lineages.len(),
                derived,
                split.ancestral,
                self.time,
            );

            self.populations[split.ancestral.index()].extend(lineages);
        }
    }

    fn recombine(&mut self, total_links: NonZeroU64) {
        let mut link = self.rng.sample_index_u64(total_links);

        let mut chosen = None;

        'search: for (population, lineages) in self.populations.iter().enumerate() {
            for (index, lineage) in lineages.iter().enumerate() {
                let links = lineage.links();

                if link < links {
                    chosen = Some((population, index));
                    break 'search;
                }

                link -= links;
            }
        }

        if let Some((population, index)) = chosen {
            let lineage = &mut self.populations[population][index];

            if let Some(left) = lineage.left() {
                let right = lineage.split_off(left + 1 + link);

                self.populations[population].push(right);
                self.num_recombinations += 1;
            }
        }
    }

    fn coalesce(&mut self, population: usize) -> Result<(), HudsonError> {
        let num_lineages = self.populations[population].len();

        let (Some(all), Some(others)) = (
            NonZeroUsize::new(num_lineages),
            NonZeroUsize::new(num_lineages.saturating_sub(1)),
        ) else {
            return Ok(());
        };

        let first = self.rng.sample_index(all);
        let mut second = self.rng.sample_index(others);
        if second >= first {
            second += 1;
        }

        let lineages = &mut self.populations[population];
        let a = lineages.swap_remove(first.max(second));
        let b = lineages.swap_remove(first.min(second));

        // The population table was filled from the same demography
        #[allow(clippy::cast_possible_truncation)]
        let merged = self.merge(PopulationId::new(population as u32), a, b)?;

        if !merged.is_empty() {
            self.populations[population].push(merged);
        }

        Ok(())
    }

    /// Merges two lineages into their common ancestor lineage, creating a
    /// new node if any of their ancestral material overlaps
    fn merge(
        &mut self,
        population: PopulationId,
        a: Lineage,
        b: Lineage,
    ) -> Result<Lineage, HudsonError> {
        let mut x: VecDeque<Segment> = a.into_segments().into();
        let mut y: VecDeque<Segment> = b.into_segments().into();

        let mut merged = Lineage::default();
        let mut parent = None;

        while let (Some(mut head_x), Some(mut head_y)) = (x.front().copied(), y.front().copied()) {
            if head_y.left < head_x.left {
                std::mem::swap(&mut x, &mut y);
                std::mem::swap(&mut head_x, &mut head_y);
            }

            if head_x.right <= head_y.left {
                merged.push(head_x);
                x.pop_front();
            } else if head_x.left < head_y.left {
                merged.push(Segment {
                    right: head_y.left,
                    ..head_x
                });

                if let Some(front) = x.front_mut() {
                    front.left = head_y.left;
                }
            } else {
                let left = head_x.left;
                let right = head_x.right.min(head_y.right);

                let node = match parent {
                    Some(node) => node,
                    None => {
                        let node = self.tables.add_node(
                            NodeFlags::empty(),
                            self.time,
                            Some(population),
                            None,
                        )?;
                        parent = Some(node);
                        node
                    },
                };

                self.record_edge(left, right, head_x.node);
                self.record_edge(left, right, head_y.node);

                for (left, right) in self.overlaps.coalesce(left, right) {
                    merged.push(Segment { left, right, node });
                }

                trim_front(&mut x, right);
                trim_front(&mut y, right);
            }
        }

        for segment in x.into_iter().chain(y) {
            merged.push(segment);
        }

        if let Some(node) = parent {
            self.flush_edges(node)?;
            self.num_coalescences += 1;
        }

        Ok(merged)
    }

    fn record_edge(&mut self, left: u64, right: u64, child: NodeId) {
        let intervals = self.edge_buffer.entry(child).or_default();

        match intervals.last_mut() {
            Some((_, last_right)) if *last_right == left => *last_right = right,
            _ => intervals.push((left, right)),
        }
    }

    fn flush_edges(&mut self, parent: NodeId) -> Result<(), HudsonError> {
        for (child, intervals) in std::mem::take(&mut self.edge_buffer) {
            for (left, right) in intervals {
                self.tables.add_edge(
                    NonNegativeF64::from(left),
                    NonNegativeF64::from(right),
                    parent,
                    child,
                )?;
            }
        }

        Ok(())
    }
}

fn trim_front(segments: &mut VecDeque<Segment>, right: u64) {
    if let Some(front) = segments.front_mut() {
        if front.right <= right {
            segments.pop_front();
        } else {
            front.left = right;
        }
    }
}
