// Stops training once the monitored loss has not improved on its
// best value for `patience` consecutive epochs.

#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best:     Option<f64>,
    stale:    usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: None, stale: 0 }
    }

    /// Record one epoch's loss. Returns `true` when training should stop.
    ///
    /// Only a strictly lower loss counts as an improvement; NaN never does.
    pub fn observe(&mut self, loss: f64) -> bool {
        let improved = match self.best {
            None       => !loss.is_nan(),
            Some(best) => loss < best,
        };

        if improved {
            self.best  = Some(loss);
            self.stale = 0;
        } else {
            self.stale += 1;
        }

        self.stale > 0 && self.stale >= self.patience
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }
}
