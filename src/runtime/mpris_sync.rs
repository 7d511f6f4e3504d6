use crate::app::App;
use crate::mpris::{MprisHandle, MprisTrack};

/// Push the controller's current state out to the MPRIS service.
pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    mpris.set_playback(app.playback_state());

    match &app.now_playing {
        Some(np) => {
            let url = app
                .tracks
                .get(app.selected)
                .map(|t| format!("file://{}", t.path.display()));

            let track = MprisTrack {
                // A blank title falls back to the file name so media
                // widgets always have something to show.
                title: if np.tags.title.is_empty() {
                    np.name.clone()
                } else {
                    np.tags.title.clone()
                },
                artist: np.tags.artist.clone(),
                album: np.tags.album.clone(),
                url,
                length: app.duration,
            };
            mpris.set_track_metadata(Some(app.selected), Some(&track));
        }
        None => mpris.set_track_metadata(None, None),
    }
}
