use galaxy_render::geometry::SphereMesh;

#[test]
fn strip_length_and_index_range() {
    let (x, y) = (8, 8);
    let mesh = SphereMesh::uv_sphere(x, y);

    assert_eq!(mesh.vertices.len() as u32, (x + 1) * (y + 1));
    assert_eq!(mesh.indices.len() as u32, 2 * (x + 1) * y);
    assert_eq!(mesh.index_count(), 144);
    assert!(mesh.indices.iter().all(|&i| i < (x + 1) * (y + 1)));
}

#[test]
fn rows_alternate_direction() {
    let mesh = SphereMesh::uv_sphere(4, 2);
    let row = 5;
    // Even row starts at the left edge, odd row at the right edge.
    assert_eq!(&mesh.indices[..2], &[0, row]);
    let odd = &mesh.indices[2 * row as usize..];
    assert_eq!(&odd[..2], &[2 * row + 4, row + 4]);
    // The strip continues where the previous row ended.
    assert_eq!(mesh.indices[2 * row as usize - 1], row + 4);
}

#[test]
fn vertices_lie_on_the_unit_sphere() {
    let mesh = SphereMesh::uv_sphere(16, 12);
    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.position;
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-5);
        assert_eq!(vertex.normal, vertex.position);
        assert!((0.0..=1.0).contains(&vertex.uv[0]) && (0.0..=1.0).contains(&vertex.uv[1]));
    }
}
