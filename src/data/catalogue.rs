use std::io::Read;

use crate::{error::AppResult, models::Song};

/// Parses catalogue rows from CSV.
///
/// Headers may use either the verbose column names of the top-50 export or
/// the short internal names; unrelated columns are ignored. Every numeric
/// attribute must be present on every row.
pub fn read_catalogue<R: Read>(reader: R) -> AppResult<Vec<Song>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut songs = Vec::new();
    for record in reader.deserialize::<Song>() {
        songs.push(record?);
    }

    Ok(songs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const VERBOSE_HEADER: &str = "\"\",title,artist,the genre of the track,year,\
\"Beats.Per.Minute -The tempo of the song\",\
\"Energy- The energy of a song - the higher the value, the more energtic\",\
\"Danceability - The higher the value, the easier it is to dance to this song\",\
\"Loudness/dB - The higher the value, the louder the song\",\
\"Liveness - The higher the value, the more likely the song is a live recording\",\
\"Valence - The higher the value, the more positive mood for the song\",\
\"Length - The duration of the song\",\
\"Acousticness - The higher the value the more acoustic the song is\",\
\"Speechiness - The higher the value the more spoken word the song contains\",\
\"Popularity- The higher the value the more popular the song is\"";

    #[test]
    fn test_reads_verbose_headers() {
        let csv = format!(
            "{}\n1,Hey Soul Sister,Train,neo mellow,2010,97,89,67,-4,8,80,217,19,4,83\n\
             2,Love The Way You Lie,Eminem,detroit hip hop,2010,87,93,75,-5,52,64,263,24,23,82\n",
            VERBOSE_HEADER
        );

        let songs = read_catalogue(csv.as_bytes()).unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Hey Soul Sister");
        assert_eq!(songs[0].genre, "neo mellow");
        assert_eq!(songs[0].tempo, 97.0);
        assert_eq!(songs[1].loudness, -5.0);
        assert_eq!(songs[1].popularity, 82.0);
    }

    #[test]
    fn test_reads_short_headers_with_padding() {
        let csv = "title,artist,genre,year,BPM,Energy,Danceability,Loudness,Liveness,Valence,Length,Acousticness,Speechiness,Popularity\n\
                   Closer , The Chainsmokers, edm ,2016,95,52,75,-6,11,66,245,41,3,86\n";

        let songs = read_catalogue(csv.as_bytes()).unwrap();

        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Closer");
        assert_eq!(songs[0].artist, "The Chainsmokers");
        assert_eq!(songs[0].genre, "edm");
        assert_eq!(songs[0].year, 2016);
    }

    #[test]
    fn test_missing_numeric_attribute_is_an_error() {
        let csv = "title,artist,genre,year,BPM,Energy,Danceability,Loudness,Liveness,Valence,Length,Acousticness,Speechiness,Popularity\n\
                   Closer,The Chainsmokers,edm,2016,95,,75,-6,11,66,245,41,3,86\n";

        let result = read_catalogue(csv.as_bytes());
        assert!(matches!(result, Err(AppError::Csv(_))));
    }
}
