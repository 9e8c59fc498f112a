use crate::error::{Error, Result};
use crate::models::VideoMatches;
use crate::utils::{
    flatten_whitespace, format_timestamp, format_upload_date, format_views, safe_file_stem,
};
use log::info;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// `<output_dir>/<phrase>_matches.txt`
pub fn default_output_path(output_dir: &Path, phrase: &str) -> PathBuf {
    output_dir.join(format!("{}_matches.txt", safe_file_stem(phrase)))
}

pub fn render(matches_by_video: &[VideoMatches]) -> String {
    Report(matches_by_video).to_string()
}

/// Videos without matches are left out.
struct Report<'a>(&'a [VideoMatches]);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.0.iter().filter(|v| !v.matches.is_empty()) {
            write_video(f, entry)?;
        }
        Ok(())
    }
}

fn write_video(f: &mut fmt::Formatter<'_>, entry: &VideoMatches) -> fmt::Result {
    let video_id = &entry.video.video_id;
    let title = entry
        .details
        .as_ref()
        .map(|d| d.title.as_str())
        .filter(|t| !t.is_empty())
        .or(entry.video.title.as_deref());

    match title {
        Some(title) => writeln!(f, "Video: {} ({video_id})", flatten_whitespace(title))?,
        None => writeln!(f, "Video: {video_id}")?,
    }

    if let Some(details) = &entry.details {
        writeln!(f, "Channel: {} ({})", details.channel_name, details.channel_id)?;
        writeln!(f, "Uploaded: {}", format_upload_date(&details.upload_date))?;
        writeln!(f, "Views: {}", format_views(details.views))?;
        writeln!(f, "URL: https://www.youtube.com/watch?v={video_id}")?;
    }

    for record in &entry.matches {
        writeln!(
            f,
            "[{}] {}",
            format_timestamp(record.start_time),
            flatten_whitespace(&record.text)
        )?;
    }
    writeln!(f)
}

/// Replaces whatever is at `path`.
pub fn write(path: &Path, matches_by_video: &[VideoMatches]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io("failed to create output directory", parent, e))?;
    }

    fs::write(path, render(matches_by_video))
        .map_err(|e| Error::io("failed to write results", path, e))?;
    info!("Generated .txt file at: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchRecord, VideoDetails, VideoRef};
    use tempfile::tempdir;

    fn record(video_id: &str, start_time: f64, text: &str) -> MatchRecord {
        MatchRecord {
            video_id: video_id.to_string(),
            start_time,
            text: text.to_string(),
        }
    }

    #[test]
    fn renders_headers_and_timestamps() {
        let videos = vec![
            VideoMatches {
                video: VideoRef::with_title("v1", "First video"),
                details: None,
                matches: vec![
                    record("v1", 65.2, "say hello"),
                    record("v1", 3725.0, "hello\nagain"),
                ],
            },
            VideoMatches {
                video: VideoRef::new("v2"),
                details: None,
                matches: vec![],
            },
            VideoMatches {
                video: VideoRef::new("v3"),
                details: None,
                matches: vec![record("v3", 0.0, "hello")],
            },
        ];

        assert_eq!(
            render(&videos),
            "Video: First video (v1)\n\
             [00:01:05] say hello\n\
             [01:02:05] hello again\n\
             \n\
             Video: v3\n\
             [00:00:00] hello\n\
             \n"
        );
    }

    #[test]
    fn details_extend_the_header() {
        let videos = vec![VideoMatches {
            video: VideoRef::new("dQw4w9WgXcQ"),
            details: Some(VideoDetails {
                title: "Never Gonna Give You Up".into(),
                channel_name: "Rick Astley".into(),
                channel_id: "UCuAXFkgsw1L7xaCfnd5JJOw".into(),
                upload_date: "2009-10-25T06:57:33Z".into(),
                views: 1234567,
            }),
            matches: vec![record("dQw4w9WgXcQ", 43.0, "never gonna give you up")],
        }];

        assert_eq!(
            render(&videos),
            "Video: Never Gonna Give You Up (dQw4w9WgXcQ)\n\
             Channel: Rick Astley (UCuAXFkgsw1L7xaCfnd5JJOw)\n\
             Uploaded: 2009-10-25\n\
             Views: 1,234,567\n\
             URL: https://www.youtube.com/watch?v=dQw4w9WgXcQ\n\
             [00:00:43] never gonna give you up\n\
             \n"
        );
    }

    #[test]
    fn write_creates_directory_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = default_output_path(&dir.path().join("transcripts"), "hello world");
        assert!(path.ends_with("transcripts/hello_world_matches.txt"));

        let videos = vec![VideoMatches {
            video: VideoRef::new("v1"),
            details: None,
            matches: vec![record("v1", 1.0, "hello world")],
        }];
        write(&path, &videos).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[00:00:01] hello world"));

        write(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let result = write(&blocker.join("out.txt"), &[]);
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
