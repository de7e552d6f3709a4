/// Image decoding for imgascii (PNG, JPEG, GIF, BMP).

pub mod image;
