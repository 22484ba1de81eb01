//! Dataset assembly and tabular export
//!
//! The [`Dataset`] is an append-only, ordered table of feature rows. Row
//! order is (game enumeration order, play order within the game) and is
//! never reordered or deduplicated, so two builds over unchanged upstream
//! data produce identical tables.

use crate::data::schema::Play;
use crate::data::statsapi::StatsApi;
use crate::features::extract_row;
use crate::{FeatureRow, GamePk, Result, SlgError};
use std::path::Path;

/// Ordered table of extracted feature rows
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<FeatureRow>,
    dropped: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of plays discarded for missing measurements
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Extract one play into the table, or count it as dropped
    pub fn add_play(&mut self, play: &Play) {
        match extract_row(play) {
            Some(row) => self.rows.push(row),
            None => self.dropped += 1,
        }
    }

    /// Append every usable play of one game, in play order
    pub fn add_game(&mut self, plays: &[Play]) {
        for play in plays {
            self.add_play(play);
        }
    }

    /// Write the table as delimited text: a header row, then one line per
    /// row with a leading ordinal index column. Written in one pass after
    /// assembly, never incrementally.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec![""];
        header.extend(FeatureRow::COLUMNS);
        writer.write_record(&header)?;

        for (index, row) in self.rows.iter().enumerate() {
            let mut record = vec![index.to_string()];
            record.extend(row.values().iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        log::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Read a table previously written by [`Self::write_csv`]
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        let mut records = reader.records();

        let header = records
            .next()
            .transpose()?
            .ok_or_else(|| SlgError::Parse(format!("{}: empty file", path.display())))?;
        let columns: Vec<&str> = header.iter().skip(1).collect();
        if columns != FeatureRow::COLUMNS {
            return Err(SlgError::Parse(format!(
                "{}: unexpected columns {:?}",
                path.display(),
                columns
            )));
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.len() != FeatureRow::COLUMNS.len() + 1 {
                return Err(SlgError::Parse(format!(
                    "{}: row {} has {} fields",
                    path.display(),
                    rows.len(),
                    record.len()
                )));
            }
            let mut values = [0.0; 14];
            for (i, field) in record.iter().skip(1).enumerate() {
                values[i] = field.parse::<f64>().map_err(|e| {
                    SlgError::Parse(format!("{}: bad number '{}': {}", path.display(), field, e))
                })?;
            }
            rows.push(FeatureRow::from_values(values));
        }

        Ok(Dataset { rows, dropped: 0 })
    }
}

/// Drives the extractor over a season's worth of games
pub struct DatasetBuilder<'a> {
    api: &'a StatsApi,
    skip_failed_games: bool,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(api: &'a StatsApi) -> Self {
        DatasetBuilder {
            api,
            skip_failed_games: true,
        }
    }

    /// Abort the whole build if a single game's fetch fails, instead of
    /// skipping that game
    pub fn fail_fast(mut self) -> Self {
        self.skip_failed_games = false;
        self
    }

    /// Fetch play-by-play for each game in order and accumulate rows
    pub fn build(&self, games: &[GamePk]) -> Result<Dataset> {
        let mut dataset = Dataset::new();
        let mut skipped_games = 0usize;

        for (i, &game_pk) in games.iter().enumerate() {
            let pbp = match self.api.play_by_play(game_pk) {
                Ok(pbp) => pbp,
                Err(e) if self.skip_failed_games => {
                    log::warn!("Skipping {}: {}", game_pk, e);
                    skipped_games += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            dataset.add_game(&pbp.all_plays);
            log::debug!(
                "{} ({}/{}): {} rows so far",
                game_pk,
                i + 1,
                games.len(),
                dataset.len()
            );
        }

        log::info!(
            "Built dataset: {} rows from {} games ({} plays dropped, {} games skipped)",
            dataset.len(),
            games.len() - skipped_games,
            dataset.dropped(),
            skipped_games
        );

        Ok(dataset)
    }
}
