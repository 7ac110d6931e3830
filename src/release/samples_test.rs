//! Sample-based regression tests for release extraction.
//!
//! Real-world release names with manually verified attributes.

use crate::language::{variants, LanguageTag};
use crate::release::{
    extract, AudioCodec, MediaHint, ReleaseAttributes, Resolution, Source, VideoCodec,
};

fn episode(name: &str) -> ReleaseAttributes {
    extract(name, MediaHint::Episode)
}

fn movie(name: &str) -> ReleaseAttributes {
    extract(name, MediaHint::Movie)
}

#[test]
fn sample_001() {
    let a = episode(
        "The.Mandalorian.S02E05.Chapter.13.The.Jedi.1080p.DSNP.WEB-DL.DDP5.1.Atmos.H.264-MZABI",
    );
    assert_eq!(a.series.as_deref(), Some("The Mandalorian"), "Sample 1: {:?}", a);
    assert_eq!(a.title.as_deref(), Some("Chapter 13 The Jedi"), "Sample 1: {:?}", a);
    assert_eq!((a.seasons.as_slice(), a.episodes.as_slice()), (&[2][..], &[5][..]));
    assert_eq!(a.streaming_service.as_deref(), Some("DSNP"));
    assert_eq!(a.source, Some(Source::WebDL));
    assert_eq!(a.audio_codec, Some(AudioCodec::EAC3));
    assert_eq!(a.video_codec, Some(VideoCodec::H264));
    assert_eq!(a.release_group.as_deref(), Some("MZABI"));
}

#[test]
fn sample_002() {
    let a = episode("Game.of.Thrones.S08E03.720p.WEB.H264-MEMENTO");
    assert_eq!(a.series.as_deref(), Some("Game of Thrones"), "Sample 2: {:?}", a);
    assert_eq!(a.season(), Some(8));
    assert_eq!(a.episode(), Some(3));
    assert_eq!(a.resolution, Some(Resolution::R720p));
    assert_eq!(a.source, Some(Source::Web));
    assert_eq!(a.release_group.as_deref(), Some("MEMENTO"));
}

#[test]
fn sample_003() {
    let a = movie("Parasite.2019.KOREAN.1080p.BluRay.x264.DTS-FGT");
    assert_eq!(a.title.as_deref(), Some("Parasite"), "Sample 3: {:?}", a);
    assert_eq!(a.year, Some(2019));
    assert_eq!(a.languages, vec![LanguageTag::base("ko", "kor")]);
    assert_eq!(a.source, Some(Source::BluRay));
    assert_eq!(a.audio_codec, Some(AudioCodec::DTS));
    assert_eq!(a.release_group.as_deref(), Some("FGT"));
}

#[test]
fn sample_004() {
    let a = episode("Friends.1x01.The.One.Where.Monica.Gets.a.Roommate.DVDRip.XviD");
    assert_eq!(a.series.as_deref(), Some("Friends"), "Sample 4: {:?}", a);
    assert_eq!(
        a.title.as_deref(),
        Some("The One Where Monica Gets a Roommate"),
        "Sample 4: {:?}",
        a
    );
    assert_eq!(a.season(), Some(1));
    assert_eq!(a.episode(), Some(1));
    assert_eq!(a.source, Some(Source::DVD));
    assert_eq!(a.video_codec, Some(VideoCodec::XviD));
    assert_eq!(a.release_group, None);
}

#[test]
fn sample_005() {
    let a = episode("Dark.S03.COMPLETE.1080p.NF.WEB-DL.DDP5.1.x264-MIXED");
    assert_eq!(a.series.as_deref(), Some("Dark"), "Sample 5: {:?}", a);
    assert_eq!(a.seasons, vec![3]);
    assert!(a.episodes.is_empty());
    assert!(a.complete);
    assert_eq!(a.streaming_service.as_deref(), Some("NF"));
    assert_eq!(a.release_group.as_deref(), Some("MIXED"));
}

#[test]
fn sample_006() {
    let a = episode("Sherlock.S01-S04.1080p.BluRay.x265");
    assert_eq!(a.series.as_deref(), Some("Sherlock"), "Sample 6: {:?}", a);
    assert_eq!(a.seasons, vec![1, 2, 3, 4]);
    assert_eq!(a.video_codec, Some(VideoCodec::H265));
}

#[test]
fn sample_007() {
    let a = episode("[Erai-raws] Jujutsu Kaisen - 24 [1080p][Multiple Subtitle].mkv");
    assert_eq!(a.series.as_deref(), Some("Jujutsu Kaisen"), "Sample 7: {:?}", a);
    assert_eq!(a.episodes, vec![24]);
    assert_eq!(a.resolution, Some(Resolution::R1080p));
    assert_eq!(a.release_group.as_deref(), Some("Erai-raws"));
}

#[test]
fn sample_008() {
    let a = movie("Amelie.2001.FRENCH.720p.BluRay.x264-LOST");
    assert_eq!(a.title.as_deref(), Some("Amelie"), "Sample 8: {:?}", a);
    assert_eq!(a.year, Some(2001));
    assert_eq!(a.languages, vec![LanguageTag::base("fr", "fra")]);
    assert_eq!(a.release_group.as_deref(), Some("LOST"));
}

#[test]
fn sample_009() {
    let a = movie("Cidade.de.Deus.2002.1080p.BluRay.x264.PT-BR");
    assert_eq!(a.title.as_deref(), Some("Cidade de Deus"), "Sample 9: {:?}", a);
    assert_eq!(a.languages, vec![variants::BRAZILIAN_PORTUGUESE.tag()]);
    assert_eq!(a.release_group, None, "Sample 9: {:?}", a);
}

#[test]
fn sample_010() {
    let a = movie("Crouching.Tiger.Hidden.Dragon.2000.CHT.720p.BluRay");
    assert_eq!(a.title.as_deref(), Some("Crouching Tiger Hidden Dragon"), "Sample 10: {:?}", a);
    assert_eq!(a.languages, vec![variants::CHINESE_TRADITIONAL.tag()]);
}

#[test]
fn sample_011() {
    let a = episode("Doctor.Who.2005.S10E01.HDTV.x264-FoV");
    assert_eq!(a.series.as_deref(), Some("Doctor Who"), "Sample 11: {:?}", a);
    assert_eq!(a.year, Some(2005));
    assert_eq!(a.season(), Some(10));
    assert_eq!(a.episode(), Some(1));
    assert_eq!(a.source, Some(Source::HDTV));
    assert_eq!(a.release_group.as_deref(), Some("FoV"));
}

#[test]
fn sample_012() {
    let a = episode("Money.Heist.S03E01.SPANISH.720p.NF.WEBRip.x264-GalaxyTV");
    assert_eq!(a.series.as_deref(), Some("Money Heist"), "Sample 12: {:?}", a);
    assert_eq!(a.title, None);
    assert_eq!(a.languages, vec![LanguageTag::base("es", "spa")]);
    assert_eq!(a.source, Some(Source::WebRip));
    assert_eq!(a.release_group.as_deref(), Some("GalaxyTV"));
}

#[test]
fn sample_013() {
    let a = episode("Casa.de.Papel.Temporada.2.720p.WEB-DL");
    assert_eq!(a.series.as_deref(), Some("Casa de Papel"), "Sample 13: {:?}", a);
    assert_eq!(a.seasons, vec![2]);
    assert_eq!(a.release_group, None);
}

#[test]
fn sample_014() {
    let a = movie("Avatar.The.Way.of.Water.2022.2160p.WEB-DL.DDP5.1.Atmos.DV.HDR.H.265-FLUX");
    assert_eq!(a.title.as_deref(), Some("Avatar The Way of Water"), "Sample 14: {:?}", a);
    assert_eq!(a.year, Some(2022));
    assert_eq!(a.resolution, Some(Resolution::R2160p));
    assert_eq!(a.audio_codec, Some(AudioCodec::EAC3));
    assert_eq!(a.video_codec, Some(VideoCodec::H265));
    assert_eq!(a.release_group.as_deref(), Some("FLUX"));
}

#[test]
fn sample_015() {
    let a = episode("The.Office.US.S05E14-15.720p.WEB-DL");
    assert_eq!(a.series.as_deref(), Some("The Office US"), "Sample 15: {:?}", a);
    assert_eq!(a.episodes, vec![14, 15]);
    assert_eq!(a.release_group, None);
}

#[test]
fn sample_016() {
    let a = episode("Planet.Earth.II.S01E01E02.2160p.UHD.BluRay.x265-TERMiNAL");
    assert_eq!(a.series.as_deref(), Some("Planet Earth II"), "Sample 16: {:?}", a);
    assert_eq!(a.episodes, vec![1, 2]);
    assert_eq!(a.release_group.as_deref(), Some("TERMiNAL"));
}

#[test]
fn sample_017() {
    let a = episode(
        "Ted.Lasso.S01E03.Trent.Crimm.The.Independent.1080p.ATVP.WEB-DL.DDP5.1.H.264-NTb",
    );
    assert_eq!(a.title.as_deref(), Some("Trent Crimm The Independent"), "Sample 17: {:?}", a);
    assert_eq!(a.streaming_service.as_deref(), Some("ATVP"));
}

#[test]
fn sample_018() {
    let a = movie("Top.Gun.Maverick.2022.1080p.AMZN.WEBRip.DDP5.1.x264-NOGRP");
    assert_eq!(a.title.as_deref(), Some("Top Gun Maverick"), "Sample 18: {:?}", a);
    assert_eq!(a.streaming_service.as_deref(), Some("AMZN"));
    assert_eq!(a.source, Some(Source::WebRip));
}

#[test]
fn sample_019() {
    let a = movie("Movie.2010.720p.BluRay.x264.ENG.FORCED");
    assert!(a.forced, "Sample 19: {:?}", a);
    assert_eq!(a.languages, vec![LanguageTag::base("en", "eng")]);
}

#[test]
fn sample_020() {
    let a = movie("????");
    assert!(a.is_empty(), "Sample 20: {:?}", a);
}
