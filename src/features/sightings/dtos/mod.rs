mod sighting_dto;

pub use sighting_dto::{
    CreateSightingDto, CreateSightingResponseDto, SightingDetailResponseDto, SightingDto,
    SightingListResponseDto,
};
