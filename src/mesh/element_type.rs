use std::fmt;

macro_rules! element_types {
    ($( $(#[$doc:meta])* $variant:ident = $code:literal, $name:literal, $nodes:literal, $dim:literal; )*) => {
        /// Element types understood by the codec, numbered with their msh type code
        ///
        /// The number of nodes of every element is fixed by its type, which is what
        /// lets an [`ElementBlock`](crate::mesh::ElementBlock) store its connectivity
        /// as a flat buffer with a constant stride.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ElementType {
            $( $(#[$doc])* $variant = $code, )*
        }

        impl ElementType {
            /// every supported type, in ascending code order
            pub const ALL: &'static [ElementType] = &[ $( ElementType::$variant, )* ];

            /// look up the type for a msh element type code
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $( $code => Some(ElementType::$variant), )*
                    _ => None,
                }
            }

            /// number of nodes in every element of this type
            pub fn num_nodes(&self) -> usize {
                match self {
                    $( ElementType::$variant => $nodes, )*
                }
            }

            /// topological dimension of the element
            pub fn dimension(&self) -> i32 {
                match self {
                    $( ElementType::$variant => $dim, )*
                }
            }

            /// short human readable name
            pub fn name(&self) -> &'static str {
                match self {
                    $( ElementType::$variant => $name, )*
                }
            }
        }
    };
}

element_types! {
    /// 2-node line
    Line2 = 1, "line", 2, 1;
    /// 3-node triangle
    Triangle3 = 2, "triangle", 3, 2;
    /// 4-node quadrangle
    Quadrangle4 = 3, "quadrangle", 4, 2;
    /// 4-node tetrahedron
    Tetrahedron4 = 4, "tetrahedron", 4, 3;
    /// 8-node hexahedron
    Hexahedron8 = 5, "hexahedron", 8, 3;
    /// 6-node prism
    Prism6 = 6, "prism", 6, 3;
    /// 5-node pyramid
    Pyramid5 = 7, "pyramid", 5, 3;
    /// second order line
    Line3 = 8, "line3", 3, 1;
    /// second order triangle
    Triangle6 = 9, "triangle6", 6, 2;
    /// second order quadrangle (with center node)
    Quadrangle9 = 10, "quadrangle9", 9, 2;
    /// second order tetrahedron
    Tetrahedron10 = 11, "tetrahedron10", 10, 3;
    /// second order hexahedron (with face and volume nodes)
    Hexahedron27 = 12, "hexahedron27", 27, 3;
    /// second order prism (with face nodes)
    Prism18 = 13, "prism18", 18, 3;
    /// second order pyramid (with face node)
    Pyramid14 = 14, "pyramid14", 14, 3;
    /// single node point
    Point = 15, "point", 1, 0;
    Quadrangle8 = 16, "quadrangle8", 8, 2;
    Hexahedron20 = 17, "hexahedron20", 20, 3;
    Prism15 = 18, "prism15", 15, 3;
    Pyramid13 = 19, "pyramid13", 13, 3;
    Triangle9 = 20, "triangle9", 9, 2;
    Triangle10 = 21, "triangle10", 10, 2;
    Triangle12 = 22, "triangle12", 12, 2;
    Triangle15 = 23, "triangle15", 15, 2;
    Triangle15Incomplete = 24, "triangle15i", 15, 2;
    Triangle21 = 25, "triangle21", 21, 2;
    Line4 = 26, "line4", 4, 1;
    Line5 = 27, "line5", 5, 1;
    Line6 = 28, "line6", 6, 1;
    Tetrahedron20 = 29, "tetrahedron20", 20, 3;
    Tetrahedron35 = 30, "tetrahedron35", 35, 3;
    Tetrahedron56 = 31, "tetrahedron56", 56, 3;
    Hexahedron64 = 92, "hexahedron64", 64, 3;
    Hexahedron125 = 93, "hexahedron125", 125, 3;
}

impl ElementType {
    /// the msh type code written to files
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl TryFrom<i32> for ElementType {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (type {})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_order_node_counts() {
        assert_eq!(ElementType::Point.num_nodes(), 1);
        assert_eq!(ElementType::Line2.num_nodes(), 2);
        assert_eq!(ElementType::Triangle3.num_nodes(), 3);
        assert_eq!(ElementType::Quadrangle4.num_nodes(), 4);
        assert_eq!(ElementType::Tetrahedron4.num_nodes(), 4);
        assert_eq!(ElementType::Hexahedron8.num_nodes(), 8);
    }

    #[test]
    fn codes_round_trip() {
        for element in ElementType::ALL {
            assert_eq!(ElementType::from_code(element.code()), Some(*element));
        }
        assert_eq!(ElementType::ALL.len(), 33);
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(ElementType::from_code(0), None);
        assert_eq!(ElementType::from_code(32), None);
        assert_eq!(ElementType::from_code(9999), None);
        assert_eq!(ElementType::try_from(-1), Err(-1));
    }

    #[test]
    fn dimensions() {
        assert_eq!(ElementType::Point.dimension(), 0);
        assert_eq!(ElementType::Line3.dimension(), 1);
        assert_eq!(ElementType::Triangle6.dimension(), 2);
        assert_eq!(ElementType::Hexahedron125.dimension(), 3);
    }
}
