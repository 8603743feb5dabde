//! Promotion of liked tracks through the chain of degree playlists.
//!
//! Every track found in the source playlist is added to the lowest degree
//! playlist that does not contain it yet, then the source playlist is
//! drained. A track liked for the third time therefore lands in the
//! degree-3 playlist (`♥♥♥` with the default marker) while staying in the
//! lower ones. Membership in degree playlists is never removed, so a track's
//! degree only grows.
//!
//! A pass is not atomic. When it stops halfway the next pass recomputes
//! everything from current playlist contents: tracks still in the source
//! playlist are promoted again from degree 1, and the degree playlists they
//! already reached are skipped.
//!
//! Draining removes tracks by URI, which drops every occurrence. A track that
//! was in the snapshot and is added to the source again while the pass runs
//! is removed with it, so that second like is lost.

use std::collections::{HashMap, HashSet};

use crate::{
    config::{Config, DEFAULT_DEGREE_MARKER, DEFAULT_SOURCE_PLAYLIST},
    error::{Error, Result},
    info,
    spotify::{self, MAX_TRACKS_PER_REQUEST, SpotifyApi},
    types::{Playlist, UserProfile},
    utils,
};

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub source_playlist: String,
    pub degree_marker: String,
    /// Create the source playlist when the user has none yet.
    pub create_source_playlist: bool,
    /// Visibility of playlists created by the reconciler.
    pub public: bool,
    pub batch_size: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            source_playlist: DEFAULT_SOURCE_PLAYLIST.to_string(),
            degree_marker: DEFAULT_DEGREE_MARKER.to_string(),
            create_source_playlist: true,
            public: true,
            batch_size: MAX_TRACKS_PER_REQUEST,
        }
    }
}

impl ReconcileOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_playlist: config.source_playlist.clone(),
            degree_marker: config.degree_marker.clone(),
            create_source_playlist: config.create_source_playlist,
            public: config.public_playlists,
            batch_size: MAX_TRACKS_PER_REQUEST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreePromotion {
    pub degree: usize,
    pub playlist: String,
    pub tracks: usize,
}

/// Outcome of one pass for one user.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub user_id: String,
    /// Distinct tracks found in the source playlist at the start of the pass.
    pub snapshot: usize,
    pub promoted: Vec<DegreePromotion>,
    pub removed: usize,
    /// Names of the playlists created during the pass.
    pub created: Vec<String>,
}

impl PassReport {
    pub fn total_promoted(&self) -> usize {
        self.promoted.iter().map(|p| p.tracks).sum()
    }

    pub fn is_noop(&self) -> bool {
        self.snapshot == 0 && self.created.is_empty()
    }
}

/// Degree playlist as currently present in the user's library.
#[derive(Debug, Clone)]
pub struct DegreeSummary {
    pub degree: usize,
    pub name: String,
    pub playlist_id: String,
    pub tracks: Option<u32>,
}

pub struct Reconciler {
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(mut options: ReconcileOptions) -> Self {
        options.batch_size = options.batch_size.clamp(1, MAX_TRACKS_PER_REQUEST);
        Self { options }
    }

    pub fn degree_name(&self, degree: usize) -> String {
        utils::degree_name(&self.options.degree_marker, degree)
    }

    /// Runs one pass for the user behind `api`.
    ///
    /// # Errors
    ///
    /// - [`Error::PlaylistOverflow`] when the playlist list has a second
    ///   page. Nothing has been changed at that point.
    /// - [`Error::SourceMissing`] when the source playlist does not exist and
    ///   creating it is disabled.
    /// - [`Error::CreatePlaylist`] when a playlist cannot be created.
    /// - Any API error. Promotions made earlier in the pass stay in place.
    pub async fn reconcile<A>(&self, api: &A) -> Result<PassReport>
    where
        A: SpotifyApi + ?Sized,
    {
        let me = api.current_user().await?;
        let mut playlists = self.playlist_index(api).await?;
        let mut report = PassReport {
            user_id: me.id.clone(),
            ..PassReport::default()
        };

        let source = match playlists.get(&self.options.source_playlist) {
            Some(source) => source.clone(),
            None if self.options.create_source_playlist => {
                let name = self.options.source_playlist.clone();
                self.create(api, &me, &name, "Like tracks by adding them here.")
                    .await?;
                report.created.push(name);
                // a brand new source playlist has nothing to promote
                return Ok(report);
            }
            None => return Err(Error::SourceMissing(self.options.source_playlist.clone())),
        };

        let snapshot = distinct(spotify::playlist_track_ids(api, &source.id).await?);
        report.snapshot = snapshot.len();
        if snapshot.is_empty() {
            return Ok(report);
        }

        let mut pending = snapshot.clone();
        let mut degree = 0;

        while !pending.is_empty() {
            degree += 1;
            let name = self.degree_name(degree);

            let (playlist, present) = match playlists.get(&name) {
                Some(playlist) => {
                    let present: HashSet<String> = spotify::playlist_track_ids(api, &playlist.id)
                        .await?
                        .into_iter()
                        .collect();
                    (playlist.clone(), present)
                }
                None => {
                    let description = match degree {
                        1 => "Tracks liked once".to_string(),
                        n => format!("Tracks liked {n} times"),
                    };
                    let created = self.create(api, &me, &name, &description).await?;
                    report.created.push(name.clone());
                    playlists.insert(name.clone(), created.clone());
                    (created, HashSet::new())
                }
            };

            // tracks already at this degree move on to the next one
            let (to_promote, carried): (Vec<String>, Vec<String>) = pending
                .into_iter()
                .partition(|track| !present.contains(track));

            for chunk in to_promote.chunks(self.options.batch_size) {
                api.add_tracks(&playlist.id, chunk).await?;
            }

            if !to_promote.is_empty() {
                report.promoted.push(DegreePromotion {
                    degree,
                    playlist: name,
                    tracks: to_promote.len(),
                });
            }

            pending = carried;
        }

        for chunk in snapshot.chunks(self.options.batch_size) {
            api.remove_tracks(&source.id, chunk).await?;
        }
        report.removed = snapshot.len();

        Ok(report)
    }

    /// Lists the consecutive degree playlists starting at degree 1.
    pub async fn degree_overview<A>(&self, api: &A) -> Result<Vec<DegreeSummary>>
    where
        A: SpotifyApi + ?Sized,
    {
        let playlists = self.playlist_index(api).await?;
        let mut degrees = Vec::new();

        for degree in 1.. {
            let name = self.degree_name(degree);
            let Some(playlist) = playlists.get(&name) else {
                break;
            };
            degrees.push(DegreeSummary {
                degree,
                name,
                playlist_id: playlist.id.clone(),
                tracks: playlist.tracks.as_ref().map(|t| t.total),
            });
        }

        Ok(degrees)
    }

    /// Playlists by name. The first playlist wins when names repeat.
    async fn playlist_index<A>(&self, api: &A) -> Result<HashMap<String, Playlist>>
    where
        A: SpotifyApi + ?Sized,
    {
        let page = api.current_user_playlists().await?;
        if page.next.is_some() {
            return Err(Error::PlaylistOverflow(page.items.len()));
        }

        let mut index = HashMap::with_capacity(page.items.len());
        for playlist in page.items {
            index.entry(playlist.name.clone()).or_insert(playlist);
        }
        Ok(index)
    }

    async fn create<A>(
        &self,
        api: &A,
        me: &UserProfile,
        name: &str,
        description: &str,
    ) -> Result<Playlist>
    where
        A: SpotifyApi + ?Sized,
    {
        let playlist = api
            .create_playlist(&me.id, name, self.options.public, description)
            .await
            .map_err(|e| match e {
                Error::CreatePlaylist { .. } => e,
                other => Error::CreatePlaylist {
                    name: name.to_string(),
                    reason: other.to_string(),
                },
            })?;

        info!("Created playlist {} for {}", name, me.name());
        Ok(playlist)
    }
}

/// Drops repeated ids, keeping the first occurrence.
fn distinct(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
